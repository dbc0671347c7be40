use proc_macro::TokenStream;
use quote::quote;
use syn::{FnArg, ItemFn, ReturnType, parse_macro_input, spanned::Spanned};

/// Runs the body of a function on the global serial executor.
///
/// A function returning `()` becomes `fn(..) -> Result<(), RejectedError>`; a
/// function returning `T` becomes `fn(..) -> Result<TaskHandle<T>, RejectedError>`.
/// Arguments are moved into the task, so they must be `Send + 'static`.
#[proc_macro_attribute]
pub fn serial(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);

    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return syn::Error::new(attr.span(), "#[serial] takes no arguments")
            .to_compile_error()
            .into();
    }

    match expand(input_fn) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input_fn: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let sig = &input_fn.sig;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "#[serial] functions run on a plain thread and cannot be async",
        ));
    }
    if let Some(constness) = &sig.constness {
        return Err(syn::Error::new(
            constness.span(),
            "#[serial] functions submit work at run time and cannot be const",
        ));
    }
    if let Some(unsafety) = &sig.unsafety {
        return Err(syn::Error::new(
            unsafety.span(),
            "#[serial] cannot be used on unsafe functions",
        ));
    }
    if let Some(abi) = &sig.abi {
        return Err(syn::Error::new(
            abi.span(),
            "#[serial] cannot be used on extern functions",
        ));
    }
    if let Some(receiver) = sig.inputs.iter().find(|arg| matches!(arg, FnArg::Receiver(_))) {
        return Err(syn::Error::new(
            receiver.span(),
            "#[serial] cannot be used on methods taking self",
        ));
    }

    let attrs = &input_fn.attrs;
    let fn_vis = &input_fn.vis;
    let fn_name = &sig.ident;
    let fn_inputs = &sig.inputs;
    let fn_body = &input_fn.block;
    let (impl_generics, _, where_clause) = sig.generics.split_for_impl();

    let expanded = match &sig.output {
        ReturnType::Default => quote! {
            #(#attrs)*
            #fn_vis fn #fn_name #impl_generics (#fn_inputs)
                -> ::std::result::Result<(), ::ordo::runtime::RejectedError>
            #where_clause
            {
                ::ordo::runtime::submit(move || -> () #fn_body)
            }
        },
        ReturnType::Type(_, ty) => quote! {
            #(#attrs)*
            #fn_vis fn #fn_name #impl_generics (#fn_inputs)
                -> ::std::result::Result<::ordo::runtime::TaskHandle<#ty>, ::ordo::runtime::RejectedError>
            #where_clause
            {
                ::ordo::runtime::spawn(move || -> #ty #fn_body)
            }
        },
    };

    Ok(expanded)
}
