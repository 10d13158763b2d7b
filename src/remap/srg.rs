//! Reader for SRG mapping files.
//!
//! SRG is the line format the remapping fork ships its plugin mappings in:
//!
//! ```text
//! PK: net/minecraft/server/v1_7_R4 net/minecraft/server
//! CL: net/minecraft/server/v1_7_R4/World net/minecraft/world/World
//! FD: net/minecraft/server/v1_7_R4/Entity/locX net/minecraft/entity/Entity/field_70165_t
//! MD: net/minecraft/server/v1_7_R4/World/getType (III)V net/minecraft/world/World/func_147439_a (III)V
//! ```
//!
//! Package lines are ignored; blank lines and `#` comments are skipped.

use std::collections::BTreeMap;

use crate::{remap::RemapTable, Result};

/// Parse SRG text into a [`RemapTable`].
///
/// # Errors
///
/// Returns [`crate::Error::Mapping`] with the 1-based line number for an unknown record
/// kind, a wrong number of columns, or a member name without an owner.
///
/// # Examples
///
/// ```rust
/// use hostreflect::remap::parse_srg;
///
/// let table = parse_srg("CL: a/B x/Y\nFD: a/B/c x/Y/d\n")?;
/// assert_eq!(table.map_type("a/B"), Some("x/Y"));
/// assert_eq!(table.map_field("a/B", "c"), Some("d"));
/// # Ok::<(), hostreflect::Error>(())
/// ```
pub fn parse_srg(input: &str) -> Result<RemapTable> {
    let mut types = BTreeMap::new();
    let mut fields = BTreeMap::new();
    let mut methods = BTreeMap::new();

    for (index, raw) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (kind, rest) = line
            .split_once(':')
            .ok_or_else(|| mapping_error!(line_number, "missing record kind in '{}'", line))?;
        let columns: Vec<&str> = rest.split_whitespace().collect();

        match kind {
            "PK" => {}
            "CL" => {
                let [unmapped, mapped] = columns[..] else {
                    return Err(mapping_error!(line_number, "CL expects 2 columns, got {}", columns.len()));
                };
                types.insert(unmapped.to_string(), mapped.to_string());
            }
            "FD" => {
                let [unmapped, mapped] = columns[..] else {
                    return Err(mapping_error!(line_number, "FD expects 2 columns, got {}", columns.len()));
                };
                let (_, mapped_name) = split_member(mapped, line_number)?;
                split_member(unmapped, line_number)?;
                fields.insert(unmapped.to_string(), mapped_name.to_string());
            }
            "MD" => {
                let [unmapped, descriptor, mapped, _] = columns[..] else {
                    return Err(mapping_error!(line_number, "MD expects 4 columns, got {}", columns.len()));
                };
                let (_, mapped_name) = split_member(mapped, line_number)?;
                split_member(unmapped, line_number)?;
                methods.insert(format!("{} {}", unmapped, descriptor), mapped_name.to_string());
            }
            other => {
                return Err(mapping_error!(line_number, "unknown record kind '{}'", other));
            }
        }
    }

    Ok(RemapTable::new(types, fields, methods))
}

/// Split `owner/member` at the last slash.
fn split_member(qualified: &str, line_number: usize) -> Result<(&str, &str)> {
    match qualified.rsplit_once('/') {
        Some((owner, member)) if !owner.is_empty() && !member.is_empty() => Ok((owner, member)),
        _ => Err(mapping_error!(
            line_number,
            "'{}' is not an owner-qualified member",
            qualified
        )),
    }
}
