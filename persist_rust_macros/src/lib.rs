mod identifiable;

use proc_macro::TokenStream;

/// Derive macro for the `Identifiable` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Identifiable)]
/// struct Dummy {
///     pub id: String,
///     pub key: String,
///     pub content: String,
/// }
///
/// #[derive(Clone, Serialize, Deserialize, Identifiable)]
/// struct Account {
///     #[identifiable(id)]
///     pub account_no: Option<u64>,
///     pub owner: String,
/// }
/// ```
///
/// - `#[identifiable(id)]` marks the field used as the unique identifier.
/// - If omitted, the field named `id` (compared case-insensitively) is used.
/// - An `Option<K>` field produces `Key = K`; `None` counts as an empty id.
#[proc_macro_derive(Identifiable, attributes(identifiable))]
pub fn derive_identifiable(input: TokenStream) -> TokenStream {
    identifiable::derive_identifiable(input)
}
