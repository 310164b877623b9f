//! Test-method discovery for the waft testing framework.
//!
//! `#[waft::suite]` goes on an inherent `impl` block of a test unit. Every method whose name starts with `test_`
//! (or the prefix given as `#[waft::suite(prefix = "check_")]`) becomes a `waft::TestMethod`, in declaration order,
//! through a generated `waft::MethodDiscovery` impl. Each method carries that prefix so the runner strips the same
//! one when naming the test.
//!
//! # Example
//! ```ignore
//! #[waft::suite]
//! impl CalculatorTests {
//!     fn test_add(&mut self, t: &mut Expectations) {
//!         t.expect_equal(1 + 1, 2);
//!     }
//! }
//!
//! // Generates:
//! impl waft::MethodDiscovery for CalculatorTests {
//!     fn test_methods() -> Vec<waft::TestMethod<Self>> {
//!         vec![
//!             waft::TestMethod::new("test_add", |unit, t| waft::IntoOutcome::into_outcome(unit.test_add(t)))
//!                 .with_prefix("test_"),
//!         ]
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, parse_macro_input};

/// Method-name prefix that marks a test method unless `prefix = "..."` is given.
const TEST_PREFIX: &str = "test_";

/// Implements `waft::MethodDiscovery` for the annotated impl block's self type.
///
/// The impl block itself is emitted unchanged. Methods named `test_*` must borrow `self` and take exactly one more
/// parameter, the `&mut waft::Expectations` context; their return type must implement `waft::IntoOutcome`.
///
/// The only accepted argument is `prefix = "..."`, a non-empty method-name prefix replacing `test_`.
#[proc_macro_attribute]
pub fn suite(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut prefix = LitStr::new(TEST_PREFIX, Span::call_site());
    let args = syn::meta::parser(|meta| {
        if meta.path.is_ident("prefix") {
            let value: LitStr = meta.value()?.parse()?;
            if value.value().is_empty() {
                return Err(syn::Error::new(value.span(), "the test prefix cannot be empty"));
            }
            prefix = value;
            Ok(())
        } else {
            Err(meta.error("unsupported `#[waft::suite]` argument, expected `prefix = \"...\"`"))
        }
    });
    parse_macro_input!(attr with args);

    let input = parse_macro_input!(item as ItemImpl);
    let discovery = expand_suite(&input, &prefix).unwrap_or_else(syn::Error::into_compile_error);

    TokenStream::from(quote! {
        #input
        #discovery
    })
}

fn expand_suite(input: &ItemImpl, prefix: &LitStr) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "`#[waft::suite]` must be placed on an inherent impl block",
        ));
    }

    let mut errors: Option<syn::Error> = None;
    let mut methods = Vec::new();
    for item in &input.items {
        let ImplItem::Fn(method) = item else { continue };
        if !method.sig.ident.to_string().starts_with(&prefix.value()) {
            continue;
        }
        match check_signature(method) {
            Ok(()) => methods.push(&method.sig.ident),
            // Report every malformed test method at once
            Err(err) => match errors.as_mut() {
                Some(all) => all.combine(err),
                None => errors = Some(err),
            },
        }
    }
    if let Some(err) = errors {
        return Err(err);
    }

    let entries = methods.iter().map(|ident| {
        let name = ident.to_string();
        // Spanned on the method name so errors converted here point at the test method.
        let outcome = quote_spanned! {ident.span()=>
            ::waft::IntoOutcome::into_outcome(unit.#ident(expectations))
        };
        quote! {
            ::waft::TestMethod::new(#name, |unit: &mut Self, expectations: &mut ::waft::Expectations| {
                #outcome
            })
            .with_prefix(#prefix)
        }
    });
    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::waft::MethodDiscovery for #self_ty #where_clause {
            fn test_methods() -> ::std::vec::Vec<::waft::TestMethod<Self>> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

fn check_signature(method: &ImplItemFn) -> syn::Result<()> {
    let sig = &method.sig;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new(asyncness.span(), "test methods cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(sig.generics.span(), "test methods cannot be generic"));
    }

    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => {}
        Some(FnArg::Receiver(receiver)) => {
            return Err(syn::Error::new(
                receiver.span(),
                "test methods must borrow the test unit (`&mut self` or `&self`)",
            ));
        }
        _ => {
            return Err(syn::Error::new(
                sig.span(),
                "test methods take `&mut self` (or `&self`) as their first parameter",
            ));
        }
    }

    if sig.inputs.len() != 2 {
        return Err(syn::Error::new(
            sig.inputs.span(),
            "test methods take exactly one parameter besides `self`: `&mut waft::Expectations`",
        ));
    }

    Ok(())
}
