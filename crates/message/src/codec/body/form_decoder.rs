//! `application/x-www-form-urlencoded` bodies.

use tracing::trace;

use crate::codec::percent::form_pairs;
use crate::protocol::FieldTable;

/// Splits the body on `&`, then each token on its first `=`, and decodes both
/// halves. Tokens without `=` are ignored.
pub(crate) fn decode_form(body: &[u8]) -> FieldTable {
    let fields: FieldTable = form_pairs(body, b'&').collect();
    trace!(fields = fields.len(), "decoded url-encoded body");
    fields
}
