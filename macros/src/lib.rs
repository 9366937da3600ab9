use proc_macro::TokenStream;
use quote::quote;
use syn::{Ident, ItemFn, LitStr, parse_macro_input, spanned::Spanned};

const USAGE: &str = "rxsignal_macro::test only accepts: #[rxsignal_macro::test], \
                     #[rxsignal_macro::test(local)], #[rxsignal_macro::test(shared)], or string \
                     equivalents";

/// Test attribute shared by the unit and integration tests.
///
/// Sync functions become plain `#[test]`s. Async functions run on tokio:
/// `local` picks the current-thread runtime (the default), `shared` the
/// multi-thread runtime.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let is_async = input.sig.asyncness.is_some();

  let raw_args = proc_macro2::TokenStream::from(attr);
  let flavor = if raw_args.is_empty() {
    None
  } else {
    if !is_async {
      return TokenStream::from(
        syn::Error::new(
          raw_args.span(),
          "rxsignal_macro::test flavor args are only supported for async tests. Use \
           #[rxsignal_macro::test] for sync tests, or make the function async.",
        )
        .to_compile_error(),
      );
    }

    let (name, span) = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      (ident.to_string(), ident.span())
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      (lit.value(), lit.span())
    } else {
      return TokenStream::from(syn::Error::new(raw_args.span(), USAGE).to_compile_error());
    };

    match name.as_str() {
      "local" => Some(quote!(flavor = "current_thread")),
      "shared" => Some(quote!(flavor = "multi_thread", worker_threads = 2)),
      _ => return TokenStream::from(syn::Error::new(span, USAGE).to_compile_error()),
    }
  };

  let attr = match (is_async, flavor) {
    (false, _) => quote!(#[test]),
    (true, None) => quote!(#[tokio::test]),
    (true, Some(flavor)) => quote!(#[tokio::test(#flavor)]),
  };

  let expanded = quote! {
      #attr
      #input
  };

  TokenStream::from(expanded)
}
