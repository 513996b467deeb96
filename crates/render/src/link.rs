//! WhatsApp deep links and the opener that launches them.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;
use wawidget_protocol::ContactOption;

use crate::error::Result;

/// Characters escaped in a URI component: everything except letters,
/// digits and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Text of the product help message; the product URL goes between the parts.
const PRODUCT_HELP_PREFIX: &str = "Hola, estoy interesado en este producto";
const PRODUCT_HELP_SUFFIX: &str = "*¿me puedes ayudar en mi compra?*";

/// Escapes `value` for use as a query string component.
///
/// # Examples
///
/// ```
/// use wawidget_render::link::encode_component;
///
/// assert_eq!(encode_component("Hola, ¿qué tal?"), "Hola%2C%20%C2%BFqu%C3%A9%20tal%3F");
/// assert_eq!(encode_component("a-b_c.d!~*'()"), "a-b_c.d!~*'()");
/// ```
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Builds the conversation link for a `whatsapp` option.
///
/// The option's predefined message is pre-filled; a missing number or
/// message becomes empty.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::{ContactOption, OptionId, OptionType};
/// use wawidget_render::link::whatsapp_option_link;
///
/// let mut option = ContactOption::new(OptionId::Numeric(1), "Ventas", OptionType::Whatsapp);
/// option.mobile_phone = Some("573001234567".into());
/// option.predefined_message = Some("Hola, quiero comprar".into());
///
/// assert_eq!(
///     whatsapp_option_link(&option),
///     "https://api.whatsapp.com/send/?phone=573001234567&text=Hola%2C%20quiero%20comprar&type=phone_number&app_absent=0"
/// );
/// ```
#[must_use]
pub fn whatsapp_option_link(option: &ContactOption) -> String {
    let phone = option.mobile_phone.as_deref().unwrap_or_default();
    let text = option.predefined_message.as_deref().unwrap_or_default();
    format!(
        "https://api.whatsapp.com/send/?phone={}&text={}&type=phone_number&app_absent=0",
        encode_component(phone),
        encode_component(text)
    )
}

/// Builds the "help me with this product" link of the WhatsApp button.
///
/// # Examples
///
/// ```
/// use wawidget_render::link::product_help_link;
///
/// let link = product_help_link("573001234567", "https://tienda.co/p/1");
/// assert!(link.starts_with("https://wa.me/573001234567?text=Hola%2C%20estoy"));
/// assert!(link.contains("https%3A%2F%2Ftienda.co%2Fp%2F1"));
/// ```
#[must_use]
pub fn product_help_link(phone: &str, product_url: &str) -> String {
    let message = format!("{PRODUCT_HELP_PREFIX} {product_url} {PRODUCT_HELP_SUFFIX}");
    format!(
        "https://wa.me/{}?text={}",
        encode_component(phone),
        encode_component(&message)
    )
}

/// Opens a link in a new browsing context.
pub trait LinkOpener: Send + Sync {
    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be handed off.
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens links with the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        debug!(%url, "opening link in browser");
        open::that_detached(url)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wawidget_protocol::{OptionId, OptionType};

    #[test]
    fn option_link_without_number_or_message() {
        let option = ContactOption::new(OptionId::Numeric(1), "Ventas", OptionType::Whatsapp);
        assert_eq!(
            whatsapp_option_link(&option),
            "https://api.whatsapp.com/send/?phone=&text=&type=phone_number&app_absent=0"
        );
    }

    #[test]
    fn product_link_encodes_full_message() {
        let link = product_help_link("573001234567", "https://tienda.co/p?id=1&c=2");
        let text = link.split_once("?text=").unwrap().1;
        assert!(!text.contains('&'));
        assert!(!text.contains(' '));
        assert!(text.ends_with("*%C2%BFme%20puedes%20ayudar%20en%20mi%20compra%3F*"));
    }

    #[test]
    fn encode_leaves_unreserved_marks() {
        assert_eq!(encode_component("*"), "*");
        assert_eq!(encode_component("+57 300"), "%2B57%20300");
    }
}
