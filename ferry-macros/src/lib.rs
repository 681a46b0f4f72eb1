mod decode_column;
mod decode_enum;
mod decode_table;

use decode_enum::decode_enum;
use decode_table::decode_table;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemEnum, ItemStruct, parse_macro_input};

#[proc_macro_derive(Entity, attributes(ferry))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let table = decode_table(&item);
    let (table_name, schema, catalog) = (&table.name, &table.schema, &table.catalog);
    let columns_defs = table.columns.iter().map(|c| {
        let ty = &c.ty;
        let field = &c.field;
        let column = &c.name;
        let identity = c.identity;
        let computed = c.computed;
        let writable = !c.read_only;
        quote! {
            ::ferry::ColumnDef {
                name: ::std::borrow::Cow::Borrowed(#column),
                nullable: <#ty as ::ferry::AsValue>::NULLABLE,
                identity: #identity,
                computed: #computed,
                writable: #writable,
                ..::ferry::ColumnDef::new(#field, <#ty as ::ferry::AsValue>::as_empty_value())
            }
        }
    });
    let get_values = table.columns.iter().map(|c| {
        let ident = &c.ident;
        let field = &c.field;
        quote!(#field => ::ferry::AsValue::as_value(::std::clone::Clone::clone(&self.#ident)),)
    });
    let set_values = table.columns.iter().map(|c| {
        let ident = &c.ident;
        let field = &c.field;
        quote!(#field => self.#ident = ::ferry::AsValue::try_from_value(value)?,)
    });
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    quote! {
        impl #impl_generics ::ferry::Entity for #name #ty_generics #where_clause {
            fn table_ref() -> ::ferry::TableRef {
                ::ferry::TableRef::new(#table_name)
                    .with_schema(#schema)
                    .with_catalog(#catalog)
            }

            fn columns() -> ::std::vec::Vec<::ferry::ColumnDef> {
                vec![#(#columns_defs),*]
            }

            fn column_value(&self, field: &str) -> ::std::option::Option<::ferry::Value> {
                ::std::option::Option::Some(match field {
                    #(#get_values)*
                    _ => return ::std::option::Option::None,
                })
            }

            #[allow(unused_variables)]
            fn set_column_value(&mut self, field: &str, value: ::ferry::Value) -> ::ferry::Result<()> {
                match field {
                    #(#set_values)*
                    _ => {}
                }
                ::std::result::Result::Ok(())
            }
        }
    }
    .into()
}

#[proc_macro_derive(Enumeration, attributes(ferry))]
pub fn derive_enumeration(input: TokenStream) -> TokenStream {
    let item: ItemEnum = parse_macro_input!(input as ItemEnum);
    let name = &item.ident;
    let metadata = decode_enum(&item);
    let members = metadata.members.iter().map(|(ident, ordinal)| {
        let member = ident.to_string();
        quote!(::ferry::EnumMember { name: #member, ordinal: #ordinal })
    });
    let to_ordinal = metadata
        .members
        .iter()
        .map(|(ident, ordinal)| quote!(Self::#ident => #ordinal,));
    let from_ordinal = metadata
        .members
        .iter()
        .map(|(ident, ordinal)| quote!(#ordinal => ::std::option::Option::Some(Self::#ident),));
    let (other_to_ordinal, other_from_ordinal) = match &metadata.other {
        Some(other) => (
            quote!(Self::#other(v) => *v,),
            quote!(v => ::std::option::Option::Some(Self::#other(v)),),
        ),
        None => (quote!(), quote!(_ => ::std::option::Option::None,)),
    };
    quote! {
        impl ::ferry::Enumeration for #name {
            const MEMBERS: &'static [::ferry::EnumMember] = &[#(#members),*];

            fn ordinal(&self) -> i64 {
                match self {
                    #(#to_ordinal)*
                    #other_to_ordinal
                }
            }

            fn from_ordinal(ordinal: i64) -> ::std::option::Option<Self> {
                match ordinal {
                    #(#from_ordinal)*
                    #other_from_ordinal
                }
            }
        }

        impl ::ferry::AsValue for #name {
            fn as_empty_value() -> ::ferry::Value {
                ::ferry::Value::Enum(None, <Self as ::ferry::Enumeration>::MEMBERS)
            }

            fn as_value(self) -> ::ferry::Value {
                ::ferry::Value::Enum(
                    Some(<Self as ::ferry::Enumeration>::ordinal(&self)),
                    <Self as ::ferry::Enumeration>::MEMBERS,
                )
            }

            fn try_from_value(value: ::ferry::Value) -> ::ferry::Result<Self> {
                ::ferry::enum_from_value(value)
            }
        }
    }
    .into()
}
