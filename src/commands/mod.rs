pub mod describe;
pub mod serve;
