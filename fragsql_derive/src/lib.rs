use proc_macro::TokenStream;

mod binary;
mod unary;

/// Generates one `Op` combinator per variant, named after the variant in
/// snake case (`#[binary(rename = "...")]` overrides the name).
#[proc_macro_derive(BinaryOperator, attributes(binary))]
pub fn binary_operator_methods(input: TokenStream) -> TokenStream {
    binary::binary_operator_methods_impl(input)
}

/// Generates one suffix `Op` method per variant, e.g. `IsNull` -> `is_null()`.
#[proc_macro_derive(UnaryOperator)]
pub fn unary_operator_methods(input: TokenStream) -> TokenStream {
    unary::unary_operator_methods_impl(input)
}
