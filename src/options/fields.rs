use serde::{Deserialize, Serialize};

use super::node::{ConfigNode, OrderedMap, Scalar};

/// One declared input field of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
}

/// Map each field name to its description, type and required flag, in
/// declaration order. A repeated name overwrites the earlier entry in place.
pub fn build_fields(specs: &[FieldSpec]) -> OrderedMap {
    let mut fields = OrderedMap::new();
    for spec in specs {
        let mut entry = OrderedMap::new();
        entry.insert("description", ConfigNode::string(spec.description.clone()));
        entry.insert("field_type", ConfigNode::string(spec.field_type.clone()));
        entry.insert("required", ConfigNode::Scalar(Scalar::Bool(spec.required)));
        fields.insert(spec.name.clone(), ConfigNode::Map(entry));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(name: &str, description: &str, required: bool) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            description: description.into(),
            field_type: "string".into(),
            required,
        }
    }

    #[test]
    fn builds_descriptors_in_order() {
        let fields = build_fields(&[spec("name", "Full name", true), spec("phone", "Phone", false)]);
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            json!({
                "name": {"description": "Full name", "field_type": "string", "required": true},
                "phone": {"description": "Phone", "field_type": "string", "required": false}
            })
            .to_string()
        );
    }

    #[test]
    fn duplicate_name_overwrites_in_place() {
        let fields = build_fields(&[
            spec("name", "first", true),
            spec("phone", "Phone", false),
            spec("name", "second", false),
        ]);
        let keys: Vec<_> = fields.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["name", "phone"]);
        let name = fields.get("name").and_then(ConfigNode::as_map).unwrap();
        assert_eq!(name.get("description").and_then(ConfigNode::as_str), Some("second"));
    }

    #[test]
    fn empty_specs_give_empty_map() {
        assert!(build_fields(&[]).is_empty());
    }

    #[test]
    fn specs_parse_with_defaults() {
        let specs: Vec<FieldSpec> =
            serde_json::from_value(json!([{"name": "id", "required": true}])).unwrap();
        assert_eq!(specs[0].description, "");
        assert!(specs[0].required);
    }
}
