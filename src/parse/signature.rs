//! Type-signature line parser.
//!
//! Handles lines the classifier has recognized as signatures:
//!
//! ```text
//! name :: popTypes -> pushTypes ( | popTypes -> pushTypes )*
//! ```

use crate::core::NameTable;
use crate::error::ParseError;
use crate::types::{SignatureUnit, Type, TypeSignature};

use super::Tokens;

/// Parse a signature line into a [`TypeSignature`].
///
/// The name is everything before the first `::`, trimmed, taken verbatim.
/// After it, type tokens accumulate into the pops of the current unit
/// until `->`, then into its pushes until `|` or the end of the line.
/// `|` finishes the unit and starts the next one over at its pops.
pub(super) fn parse_signature(
    line: &str,
    names: &mut NameTable,
) -> Result<TypeSignature, ParseError> {
    let (name, rest) = match line.split_once("::") {
        Some(parts) => parts,
        // the classifier only sends lines containing a free-standing ::
        None => (line, ""),
    };
    let name = names.get_or_insert(name.trim());

    let mut units = Vec::new();
    let mut unit = SignatureUnit::default();
    let mut seen_arrow = false;
    for token in Tokens::new(rest) {
        match token {
            "->" if !seen_arrow => seen_arrow = true,
            "|" => {
                if !seen_arrow {
                    return Err(ParseError::MisplacedAlternative);
                }
                units.push(std::mem::take(&mut unit));
                seen_arrow = false;
            }
            _ => {
                // a second -> in one unit falls through and is fatal here
                let ty = Type::from_token(token)?;
                if seen_arrow {
                    unit.pushes.push(ty);
                } else {
                    unit.pops.push(ty);
                }
            }
        }
    }
    units.push(unit);

    Ok(TypeSignature { name, units })
}
