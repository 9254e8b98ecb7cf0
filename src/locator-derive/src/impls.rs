use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, FnArg, GenericArgument, Ident,
    ImplItem, ImplItemFn, ItemImpl, PathArguments, Result as SynResult, ReturnType, Signature,
    Type, TypePath,
};

use crate::attrs::AttributeData;

const RETURN_TYPE_MESSAGE: &str = "a singleton constructor's return type should be `Self` or `Result<Self, E>`";

#[derive(Debug)]
struct ConstructorData {
    identifier: Ident,
    return_type: ReturnTypeData,
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result { error_type: Type },
}

struct AttributeRemovalVisitor;

impl VisitMut for AttributeRemovalVisitor {
    fn visit_attributes_mut(&mut self, attrs: &mut Vec<Attribute>) {
        attrs.retain(|attr| !is_instance_attribute(attr));
        attrs
            .iter_mut()
            .for_each(|attr| visit_mut::visit_attribute_mut(self, attr));
    }
}

pub fn expand_implementation(
    impls: TokenStream,
    attr_data: AttributeData,
) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[singleton]` should be annotated on the `impl` block",
            ))
        }
    };

    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[singleton]` should be annotated on an inherent `impl` block",
        ));
    }

    let self_type = get_self_type(&impls)?;
    let signature = get_constructor_signature(&impls.items, self_type.span())?;
    let ctor_data = parse_constructor(signature, &self_type)?;

    let expanded = expand_singleton_implementation(&impls, &self_type, ctor_data, attr_data);

    let mut visitor = AttributeRemovalVisitor;
    visitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    if let Type::Path(ty) = impls.self_ty.as_ref() {
        Ok(ty.clone())
    } else {
        Err(SynError::new(impls.self_ty.span(), "invalid self type"))
    }
}

fn get_constructor_signature(items: &[ImplItem], self_span: Span) -> SynResult<Signature> {
    let ctors: Vec<_> = items
        .iter()
        .filter_map(filter_and_map_item_fn)
        .filter(is_annotated_with_instance)
        .collect();

    let signature = if ctors.len() > 1 {
        return Err(SynError::new(
            self_span,
            "only one associated function can be annotated with `#[instance]`",
        ));
    } else if let Some(&ctor) = ctors.first() {
        ctor.sig.clone()
    } else {
        return Err(SynError::new(
            self_span,
            "no associated function is annotated with `#[instance]`",
        ));
    };

    match signature.inputs.first() {
        Some(FnArg::Receiver(rec)) => Err(SynError::new(
            rec.self_token.span,
            "method is not allowed to be annotated with `#[instance]`",
        )),
        Some(FnArg::Typed(arg)) => Err(SynError::new(
            arg.pat.span(),
            "a singleton constructor takes no arguments",
        )),
        None => Ok(signature),
    }
}

fn filter_and_map_item_fn(item: &ImplItem) -> Option<&ImplItemFn> {
    if let ImplItem::Fn(impl_fn) = item {
        Some(impl_fn)
    } else {
        None
    }
}

fn is_annotated_with_instance(item_fn: &&ImplItemFn) -> bool {
    item_fn.attrs.iter().any(is_instance_attribute)
}

fn is_instance_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident("instance")
}

fn parse_constructor(signature: Signature, self_type: &TypePath) -> SynResult<ConstructorData> {
    let identifier = signature.ident;
    let return_type = parse_constructor_return_type(signature.output, self_type)?;

    Ok(ConstructorData {
        identifier,
        return_type,
    })
}

fn parse_constructor_return_type(
    output: ReturnType,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let ReturnType::Type(_, return_type) = output else {
        return Err(SynError::new(output.span(), RETURN_TYPE_MESSAGE));
    };
    let Type::Path(return_type) = *return_type else {
        return Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE));
    };

    let segments = &return_type.path.segments;
    let is_result_path = |idents: &[&str]| {
        segments.len() == idents.len()
            && segments
                .iter()
                .zip(idents)
                .all(|(segment, ident)| segment.ident == ident)
    };

    if &return_type == self_type || is_self(&return_type) {
        Ok(ReturnTypeData::Infallible)
    } else if let Some(last) = segments.last().filter(|_| {
        is_result_path(&["Result"])
            || is_result_path(&["std", "result", "Result"])
            || is_result_path(&["core", "result", "Result"])
    }) {
        parse_result_return_type(&last.arguments, self_type)
    } else {
        Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE))
    }
}

fn parse_result_return_type(
    type_args: &PathArguments,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments {
        args: type_args, ..
    }) = type_args
    else {
        return Err(SynError::new(type_args.span(), RETURN_TYPE_MESSAGE));
    };

    let mut args = type_args.iter();
    match (args.next(), args.next(), args.next()) {
        (
            Some(GenericArgument::Type(Type::Path(first_type))),
            Some(GenericArgument::Type(error_type)),
            None,
        ) if first_type == self_type || is_self(first_type) => Ok(ReturnTypeData::Result {
            error_type: error_type.clone(),
        }),
        _ => Err(SynError::new(type_args.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn is_self(ty: &TypePath) -> bool {
    ty.qself.is_none() && ty.path.is_ident("Self")
}

fn expand_singleton_implementation(
    impls: &ItemImpl,
    self_type: &TypePath,
    ctor_data: ConstructorData,
    attr_data: AttributeData,
) -> TokenStream2 {
    let crate_path = &attr_data.crate_path;
    let constructor = &ctor_data.identifier;
    let (impl_generics, _, where_clause) = impls.generics.split_for_impl();

    let associated_type_error =
        if let ReturnTypeData::Result { error_type } = &ctor_data.return_type {
            quote! { type Error = #error_type; }
        } else {
            quote! { type Error = ::std::convert::Infallible; }
        };

    let create_body = if let ReturnTypeData::Infallible = &ctor_data.return_type {
        quote! { ::std::result::Result::Ok(Self::#constructor()) }
    } else {
        quote! { Self::#constructor() }
    };

    quote! {
        impl #impl_generics #crate_path::singleton::Singleton for #self_type #where_clause {
            #associated_type_error

            fn create() -> ::std::result::Result<Self, Self::Error> {
                #create_body
            }
        }
    }
}
