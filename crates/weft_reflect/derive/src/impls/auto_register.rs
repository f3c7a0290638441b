use quote::quote_spanned;

use crate::derive_data::ReflectMeta;

/// Submits the type to `inventory` for `TypeRegistry::auto_register`.
///
/// Generic types are skipped: the instantiations are unknown here.
pub(crate) fn get_auto_register_impl(meta: &ReflectMeta) -> proc_macro2::TokenStream {
    let Some(span) = meta.attrs().auto_register else {
        return crate::utils::empty();
    };
    if meta.impl_with_generic() {
        return crate::utils::empty();
    }

    let auto_register_ = crate::path::auto_register_(meta.weft_reflect_path());
    let real_ident = meta.real_ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::__AutoRegisterFunc(
                <#real_ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}
