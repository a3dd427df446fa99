use std::collections::HashSet;

use crate::schema::SchemaType;
use crate::validate::validator::Validator;

pub(crate) fn validate_type(v: &mut Validator, path: &str, ty: &SchemaType) {
    match ty {
        SchemaType::Object { fields } => {
            let mut names = HashSet::new();
            let mut wires = HashSet::new();
            for (idx, f) in fields.iter().enumerate() {
                let fpath = format!("{path}.fields[{idx}]");
                if f.name.is_empty() {
                    v.push(format!("{fpath}.name"), "must not be empty");
                }
                if !names.insert(f.name.as_str()) {
                    v.push(fpath.as_str(), format!("duplicate field `{}`", f.name));
                }
                if !wires.insert(f.wire_name()) {
                    v.push(
                        fpath.as_str(),
                        format!("duplicate serialized name `{}`", f.wire_name()),
                    );
                }
                if f.flatten && !matches!(f.ty, SchemaType::Object { .. }) {
                    v.push(format!("{fpath}.flatten"), "only object fields can be flattened");
                }
                validate_type(v, &fpath, &f.ty);
            }
        }
        SchemaType::Array { items } => validate_type(v, &format!("{path}.items"), items),
        SchemaType::Dict { values } => validate_type(v, &format!("{path}.values"), values),
        _ => {}
    }
}
