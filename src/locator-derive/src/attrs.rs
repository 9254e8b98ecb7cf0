use proc_macro::TokenStream;
use syn::parse::Parser;
use syn::{Path, Result as SynResult};

#[derive(Debug)]
pub struct AttributeData {
    pub crate_path: Path,
}

impl Default for AttributeData {
    fn default() -> Self {
        Self {
            crate_path: syn::parse_quote!(::locator),
        }
    }
}

pub fn parse_attributes(attr: TokenStream) -> SynResult<AttributeData> {
    let mut data = AttributeData::default();
    if attr.is_empty() {
        return Ok(data);
    }

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("crate") {
            data.crate_path = meta.value()?.parse()?;
            Ok(())
        } else {
            Err(meta.error("expects `#[singleton]` or `#[singleton(crate = path::to::locator)]`"))
        }
    });
    parser.parse(attr)?;

    Ok(data)
}
