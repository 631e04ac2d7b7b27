//! Query command parser.
//!
//! Grammar:
//!
//! ```text
//! COMMAND ARGS...
//!
//! COMMAND:
//!   td, typedecl    search for a type declaration
//!   tn, typename    search for names of a type
//!   md, memberdecl  search for a member declaration
//!
//! typedecl ARGS:    <ID> | [struct|union|enum] <NAME>
//! typename ARGS:    [struct|union|enum] <NAME>
//! memberdecl ARGS:  (<ID> | [struct|union|enum] <NAME>) <MEMBER>
//! ```
//!
//! A numeric first argument is a type id (C names cannot start with a
//! digit). The parser knows enough C to treat "struct foo" as the whole
//! name of a type.

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::records::TypeKind;

/// A type name to search for, optionally elaborated (`struct NAME`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSpec {
    pub elab: Option<TypeKind>,
    pub name: String,
}

/// How a type is identified in a query: by durable id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeQuery {
    Id(i64),
    Name(NameSpec),
}

/// A parsed search command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCmd {
    TypeDecl(TypeQuery),
    Typename(NameSpec),
    MemberDecl { base: TypeQuery, member: String },
}

/// Turn a command string into its struct representation.
pub fn parse_command(input: &str) -> StoreResult<SearchCmd> {
    let mut tokens = input.split_whitespace().peekable();

    let verb = tokens
        .next()
        .ok_or_else(|| StoreError::InvalidInput("no command given".into()))?;

    let cmd = match verb {
        "td" | "typedecl" => SearchCmd::TypeDecl(parse_type_query(&mut tokens)?),
        "tn" | "typename" => SearchCmd::Typename(parse_name_spec(&mut tokens)?),
        "md" | "memberdecl" => {
            let base = parse_type_query(&mut tokens)?;
            let member = tokens
                .next()
                .ok_or_else(|| StoreError::InvalidInput("missing member name".into()))?;
            SearchCmd::MemberDecl {
                base,
                member: member.to_string(),
            }
        }
        other => {
            return Err(StoreError::InvalidInput(format!(
                "unknown command '{}'",
                other
            )));
        }
    };

    if let Some(trailing) = tokens.next() {
        debug!("trailing token(s) from '{}'", trailing);
    }

    Ok(cmd)
}

fn parse_type_query<'a, I>(tokens: &mut std::iter::Peekable<I>) -> StoreResult<TypeQuery>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| StoreError::InvalidInput("missing type name or id".into()))?;

    if token.starts_with(|c: char| c.is_ascii_digit()) {
        let id: u64 = token
            .parse()
            .map_err(|_| StoreError::InvalidInput(format!("cannot parse '{}' as a type id", token)))?;
        if id > i64::MAX as u64 {
            return Err(StoreError::Range(format!("type id out of range: {}", id)));
        }
        return Ok(TypeQuery::Id(id as i64));
    }

    Ok(TypeQuery::Name(parse_name_spec_from(token, tokens)?))
}

fn parse_name_spec<'a, I>(tokens: &mut std::iter::Peekable<I>) -> StoreResult<NameSpec>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| StoreError::InvalidInput("missing type name".into()))?;
    parse_name_spec_from(token, tokens)
}

fn parse_name_spec_from<'a, I>(
    token: &str,
    tokens: &mut std::iter::Peekable<I>,
) -> StoreResult<NameSpec>
where
    I: Iterator<Item = &'a str>,
{
    let elab = match token {
        "struct" => Some(TypeKind::Struct),
        "union" => Some(TypeKind::Union),
        "enum" => Some(TypeKind::Enum),
        _ => None,
    };

    if elab.is_none() {
        return Ok(NameSpec {
            elab: None,
            name: token.to_string(),
        });
    }

    // the token was a tag keyword; the next token carries the name
    let name = tokens.next().ok_or_else(|| {
        StoreError::InvalidInput(format!("expected tag after keyword '{}'", token))
    })?;
    Ok(NameSpec {
        elab,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typedecl_by_name() {
        let cmd = parse_command("td foo").unwrap();
        assert_eq!(
            cmd,
            SearchCmd::TypeDecl(TypeQuery::Name(NameSpec {
                elab: None,
                name: "foo".into()
            }))
        );
    }

    #[test]
    fn parses_typedecl_by_elaborated_name() {
        let cmd = parse_command("typedecl struct foo").unwrap();
        assert_eq!(
            cmd,
            SearchCmd::TypeDecl(TypeQuery::Name(NameSpec {
                elab: Some(TypeKind::Struct),
                name: "foo".into()
            }))
        );
    }

    #[test]
    fn parses_typedecl_by_id() {
        let cmd = parse_command("td 42").unwrap();
        assert_eq!(cmd, SearchCmd::TypeDecl(TypeQuery::Id(42)));
    }

    #[test]
    fn rejects_id_out_of_range() {
        let err = parse_command("td 99999999999999999999").unwrap_err();
        // u64 parse failure or i64 range failure both surface as input
        // problems
        assert!(matches!(
            err,
            StoreError::InvalidInput(_) | StoreError::Range(_)
        ));
    }

    #[test]
    fn parses_typename() {
        let cmd = parse_command("tn union u").unwrap();
        assert_eq!(
            cmd,
            SearchCmd::Typename(NameSpec {
                elab: Some(TypeKind::Union),
                name: "u".into()
            })
        );
    }

    #[test]
    fn parses_memberdecl() {
        let cmd = parse_command("md struct foo bar").unwrap();
        assert_eq!(
            cmd,
            SearchCmd::MemberDecl {
                base: TypeQuery::Name(NameSpec {
                    elab: Some(TypeKind::Struct),
                    name: "foo".into()
                }),
                member: "bar".into(),
            }
        );
    }

    #[test]
    fn parses_memberdecl_by_id() {
        let cmd = parse_command("memberdecl 3 x").unwrap();
        assert_eq!(
            cmd,
            SearchCmd::MemberDecl {
                base: TypeQuery::Id(3),
                member: "x".into(),
            }
        );
    }

    #[test]
    fn rejects_empty_and_unknown() {
        assert!(matches!(
            parse_command(""),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_command("frobnicate x"),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_keyword_without_tag() {
        assert!(matches!(
            parse_command("td struct"),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_missing_member() {
        assert!(matches!(
            parse_command("md foo"),
            Err(StoreError::InvalidInput(_))
        ));
    }
}
