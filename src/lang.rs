/*! Language tag helpers.

The whole crate speaks [oxilangtag::LanguageTag] for language
identification. Upstream stages that guess the language of a document may
fail and emit the BCP-47 `und` (undetermined) tag; knowledge-base term
lookups short-circuit on it instead of wasting a query.
!*/
use oxilangtag::LanguageTag;

use crate::error::Error;

/// The tag emitted by language guessers when no language could be determined.
pub const UNDETERMINED: &str = "und";

/// Parse a BCP-47 language tag.
pub fn parse_lang(tag: &str) -> Result<LanguageTag<String>, Error> {
    Ok(LanguageTag::parse(tag.to_string())?)
}

/// Whether the tag is the `und` (undetermined) one.
pub fn is_undetermined(tag: &LanguageTag<String>) -> bool {
    tag.primary_language().eq_ignore_ascii_case(UNDETERMINED)
}
