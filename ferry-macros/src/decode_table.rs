use crate::decode_column::{ColumnMetadata, decode_column};
use quote::ToTokens;
use syn::{Fields, ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) name: String,
    pub(crate) schema: String,
    pub(crate) catalog: String,
    /// Mapped fields only, `#[ferry(skip)]` ones are left out.
    pub(crate) columns: Vec<ColumnMetadata>,
}

pub fn decode_table(item: &ItemStruct) -> TableMetadata {
    let Fields::Named(fields) = &item.fields else {
        panic!("Entity can only be derived for structs with named fields");
    };
    let columns = fields
        .named
        .iter()
        .map(decode_column)
        .filter(|c| !c.skip)
        .collect();
    let mut name = item.ident.to_string();
    let mut schema = String::new();
    let mut catalog = String::new();
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("ferry") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `ferry`, use it like: `#[ferry(attribute = value, ..)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                let target = if arg.path.is_ident("name") {
                    &mut name
                } else if arg.path.is_ident("schema") {
                    &mut schema
                } else if arg.path.is_ident("catalog") {
                    &mut catalog
                } else {
                    panic!(
                        "Unknown attribute `{}` inside ferry macro",
                        arg.path.to_token_stream()
                    );
                };
                let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    let attribute = arg.path.to_token_stream().to_string();
                    panic!(
                        "Error while parsing `{attribute}`, use it like: `#[ferry({attribute} = \"value\")]`"
                    );
                };
                *target = value.value();
                Ok(())
            });
        }
    }
    TableMetadata {
        name,
        schema,
        catalog,
        columns,
    }
}
