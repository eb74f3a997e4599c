//! Declared stack effects.
//!
//! A type signature line declares what a function pops and pushes:
//!
//! ```text
//! name :: popTypes -> pushTypes ( | popTypes -> pushTypes )*
//! ```
//!
//! Alternatives separated by `|` are overloads; each is a complete
//! `pops -> pushes` unit. Signatures are registered with the function
//! analyzer and consulted both by inlineability analysis and by runtime
//! type checking.

use std::fmt;

use smallvec::SmallVec;

use crate::core::{Name, NameTable};
use crate::error::ParseError;

/// A type token in a signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Matches any value.
    Any,
    /// A list.
    List,
    /// A list or a string.
    ListOrString,
    /// A string.
    String,
    /// An exact integer.
    Int,
    /// A float.
    Float,
}

impl Type {
    /// Parse a type token. Any word outside the fixed set is fatal.
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        match token {
            "any" => Ok(Type::Any),
            "list" => Ok(Type::List),
            "list/string" => Ok(Type::ListOrString),
            "string" => Ok(Type::String),
            "int" => Ok(Type::Int),
            "float" => Ok(Type::Float),
            other => Err(ParseError::UnknownType(other.to_owned())),
        }
    }

    /// The source spelling of this type.
    pub fn token(self) -> &'static str {
        match self {
            Type::Any => "any",
            Type::List => "list",
            Type::ListOrString => "list/string",
            Type::String => "string",
            Type::Int => "int",
            Type::Float => "float",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Ordered type list; signatures are short, so keep them inline.
pub type TypeList = SmallVec<[Type; 4]>;

/// One `pops -> pushes` alternative of a signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureUnit {
    /// Types consumed from the stack, outermost first.
    pub pops: TypeList,
    /// Types pushed onto the stack.
    pub pushes: TypeList,
}

impl fmt::Display for SignatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ty in &self.pops {
            write!(f, "{} ", ty)?;
        }
        write!(f, "->")?;
        for ty in &self.pushes {
            write!(f, " {}", ty)?;
        }
        Ok(())
    }
}

/// A declared stack effect: one or more alternatives under one name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSignature {
    /// The function this signature describes.
    pub name: Name,
    /// The alternatives, in declaration order. Never empty.
    pub units: Vec<SignatureUnit>,
}

impl TypeSignature {
    /// Render the signature back to source text.
    pub fn render(&self, names: &NameTable) -> String {
        let units: Vec<String> = self.units.iter().map(|unit| unit.to_string()).collect();
        format!("{} :: {}", names.text(self.name), units.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn known_type_tokens() {
        assert_eq!(Type::from_token("any").unwrap(), Type::Any);
        assert_eq!(Type::from_token("list").unwrap(), Type::List);
        assert_eq!(Type::from_token("list/string").unwrap(), Type::ListOrString);
        assert_eq!(Type::from_token("string").unwrap(), Type::String);
        assert_eq!(Type::from_token("int").unwrap(), Type::Int);
        assert_eq!(Type::from_token("float").unwrap(), Type::Float);
    }

    #[test]
    fn unknown_type_token_is_fatal() {
        match Type::from_token("bool") {
            Err(ParseError::UnknownType(token)) => assert_eq!(token, "bool"),
            other => panic!("expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn spelling_round_trips() {
        for token in ["any", "list", "list/string", "string", "int", "float"] {
            assert_eq!(Type::from_token(token).unwrap().token(), token);
        }
    }

    #[test]
    fn render_signature() {
        let mut names = NameTable::new();
        let name = names.get_or_insert("+");
        let sig = TypeSignature {
            name,
            units: vec![
                SignatureUnit {
                    pops: smallvec![Type::Int, Type::Int],
                    pushes: smallvec![Type::Int],
                },
                SignatureUnit {
                    pops: smallvec![Type::Float, Type::Float],
                    pushes: smallvec![Type::Float],
                },
            ],
        };
        assert_eq!(sig.render(&names), "+ :: int int -> int | float float -> float");
    }
}
