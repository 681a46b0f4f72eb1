use quote::ToTokens;
use syn::{Field, Ident, LitStr, Type, ext::IdentExt, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Field name, used by the mapper to address the field.
    pub(crate) field: String,
    /// Column name in the table.
    pub(crate) name: String,
    pub(crate) identity: bool,
    pub(crate) computed: bool,
    pub(crate) read_only: bool,
    pub(crate) skip: bool,
}

fn require_flag(arg: &syn::meta::ParseNestedMeta, flag: &str) {
    // value() is Err for Meta::Path
    let Err(..) = arg.value() else {
        panic!("Error while parsing `{flag}`, use it like: `#[ferry({flag})]`");
    };
}

pub fn decode_column(field: &Field) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Entity fields are expected to have a name");
    let name = ident.unraw().to_string();
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        field: name.clone(),
        name,
        identity: false,
        computed: false,
        read_only: false,
        skip: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("ferry") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `ferry`, use it like: `#[ferry(attribute = value, ..)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("name") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `name`, use it like: `#[ferry(name = \"my_column\")]`");
                    };
                    metadata.name = v.value();
                } else if arg.path.is_ident("identity") {
                    require_flag(&arg, "identity");
                    metadata.identity = true;
                } else if arg.path.is_ident("computed") {
                    require_flag(&arg, "computed");
                    metadata.computed = true;
                } else if arg.path.is_ident("read_only") {
                    require_flag(&arg, "read_only");
                    metadata.read_only = true;
                } else if arg.path.is_ident("skip") {
                    require_flag(&arg, "skip");
                    metadata.skip = true;
                } else {
                    panic!(
                        "Unknown attribute `{}` inside ferry macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    metadata
}
