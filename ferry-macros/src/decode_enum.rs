use proc_macro2::Span;
use quote::ToTokens;
use syn::{Error, Expr, ExprLit, ExprUnary, Fields, Ident, ItemEnum, Lit, Result, UnOp};

pub(crate) struct EnumMetadata {
    pub(crate) members: Vec<(Ident, i64)>,
    /// Tuple variant receiving the ordinals that are not declared.
    pub(crate) other: Option<Ident>,
}

fn decode_discriminant(expr: &Expr) -> Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(v), ..
        }) => v.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(..),
            expr,
            ..
        }) => decode_discriminant(expr).map(|v| -v),
        _ => Err(Error::new(
            Span::call_site(),
            format!(
                "Discriminant `{}` must be an integer literal",
                expr.to_token_stream()
            ),
        )),
    }
}

fn is_other(variant: &syn::Variant) -> bool {
    variant.attrs.iter().any(|attr| {
        let mut result = false;
        if attr.meta.path().is_ident("ferry") {
            let Ok(list) = attr.meta.require_list() else {
                panic!("Error while parsing `ferry`, use it like: `#[ferry(other)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if !arg.path.is_ident("other") {
                    panic!(
                        "Unknown attribute `{}` inside ferry macro",
                        arg.path.to_token_stream()
                    );
                }
                result = true;
                Ok(())
            });
        }
        result
    })
}

pub fn decode_enum(item: &ItemEnum) -> EnumMetadata {
    let mut members: Vec<(Ident, i64)> = Vec::with_capacity(item.variants.len());
    let mut other = None;
    let mut next = 0;
    for variant in &item.variants {
        if is_other(variant) {
            let Fields::Unnamed(fields) = &variant.fields else {
                panic!("`#[ferry(other)]` must be placed on a variant like `Other(i64)`");
            };
            if fields.unnamed.len() != 1 || other.is_some() {
                panic!("`#[ferry(other)]` must be placed on a single variant like `Other(i64)`");
            }
            other = Some(variant.ident.clone());
            continue;
        }
        if !matches!(variant.fields, Fields::Unit) {
            panic!(
                "Variant `{}` must be a unit variant, only `#[ferry(other)]` carries a value",
                variant.ident
            );
        }
        let ordinal = match &variant.discriminant {
            Some((_, expr)) => match decode_discriminant(expr) {
                Ok(v) => v,
                Err(e) => panic!("{}", e),
            },
            None => next,
        };
        if let Some((ident, _)) = members.iter().find(|(_, v)| *v == ordinal) {
            panic!(
                "Variants `{}` and `{}` have the same ordinal {}",
                ident, variant.ident, ordinal
            );
        }
        members.push((variant.ident.clone(), ordinal));
        next = ordinal + 1;
    }
    EnumMetadata { members, other }
}
