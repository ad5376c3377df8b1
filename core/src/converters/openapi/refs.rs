//! # Reference Resolution
//!
//! Resolves local `$ref` pointers (`#/components/...`, `#/parameters/...`)
//! against the raw document. External references are not followed.

use crate::error::{HikakuError, HikakuResult};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::Value;
use utoipa::openapi::RefOr;

const MAX_REF_DEPTH: usize = 32;

/// Returns the inline value, or deserializes the target of the reference.
pub fn resolve<T>(item: &RefOr<T>, root: &Value, source_name: &str) -> HikakuResult<T>
where
    T: DeserializeOwned + Clone,
{
    match item {
        RefOr::T(inline) => Ok(inline.clone()),
        RefOr::Ref(reference) => {
            let target = follow(&reference.ref_location, root, source_name)?;
            serde_json::from_value(target.clone()).map_err(|e| {
                HikakuError::unsupported(
                    source_name,
                    format!("'{}' does not point at a valid object: {}", reference.ref_location, e),
                )
            })
        }
    }
}

/// Follows a chain of local references to the final JSON value.
pub fn follow<'a>(location: &str, root: &'a Value, source_name: &str) -> HikakuResult<&'a Value> {
    let mut current = location.to_string();

    for _ in 0..MAX_REF_DEPTH {
        let target = lookup(&current, root, source_name)?;
        match target.get("$ref").and_then(Value::as_str) {
            Some(next) => current = next.to_string(),
            None => return Ok(target),
        }
    }

    Err(HikakuError::unsupported(
        source_name,
        format!("reference chain starting at '{}' is too deep or circular", location),
    ))
}

fn lookup<'a>(location: &str, root: &'a Value, source_name: &str) -> HikakuResult<&'a Value> {
    let fragment = location.strip_prefix('#').ok_or_else(|| {
        HikakuError::unsupported(
            source_name,
            format!("external reference '{}' is not supported", location),
        )
    })?;

    let pointer = percent_decode_str(fragment).decode_utf8_lossy();
    root.pointer(&pointer).ok_or_else(|| {
        HikakuError::unsupported(source_name, format!("unresolvable reference '{}'", location))
    })
}
