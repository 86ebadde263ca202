use proc_macro::TokenStream;
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Data, DeriveInput, ExprPath, Fields};

/// Derives `From<Self> for Ack`, turning an error enum into a failed
/// acknowledgement. Every variant needs a `#[kind(ErrorKind::...)]` attribute;
/// the message is the variant's `Display` output.
#[proc_macro_derive(ErrorAck, attributes(kind))]
pub fn derive_error_ack(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = input.ident;

    match input.data {
        Data::Enum(ast) => {
            let mut match_arms = Vec::new();
            for variant in ast.variants.iter() {
                let ident = &variant.ident;
                let fields = match &variant.fields {
                    Fields::Unit => quote! {},
                    Fields::Unnamed(_) => quote! { (..) },
                    Fields::Named(_) => quote! { { .. } },
                };
                let kind = variant
                    .attrs
                    .iter()
                    .find(|attr| attr.meta.path().is_ident("kind"))
                    .map(|kind| {
                        let args: ExprPath = kind
                            .parse_args()
                            .expect("#[kind(...)] only allows `ErrorKind::...` expressions");
                        args.to_token_stream()
                    });
                let Some(kind) = kind else {
                    return syn::Error::new_spanned(
                        ident,
                        "every variant needs a #[kind(ErrorKind::...)] attribute",
                    )
                    .to_compile_error()
                    .into();
                };
                match_arms.push(quote! {
                    #name::#ident #fields => #kind
                });
            }
            let expanded = quote! {
                impl From<#name> for Ack {
                    fn from(value: #name) -> Self {
                        let kind = match &value {
                            #(#match_arms),*
                        };
                        Ack::failure(kind, value.to_string())
                    }
                }
            };

            TokenStream::from(expanded)
        }
        _ => unimplemented!("This macro is only implemented for enums"),
    }
}
