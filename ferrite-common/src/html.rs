use std::fmt::Display;

/// Escapes the three characters that terminate HTML text content.
///
/// Telegram only accepts a small HTML subset and rejects the whole message
/// on a stray `<`, so anything user-controlled goes through here first.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub trait Html {
    fn escaped(&self) -> String;

    fn bold(&self) -> String;
    fn italics(&self) -> String;
    fn code(&self) -> String;
    fn pre(&self) -> String;
    fn url(&self, href: impl Display) -> String;
}

impl<T> Html for T
where
    T: Display,
{
    fn escaped(&self) -> String {
        escape_html(&self.to_string())
    }

    fn bold(&self) -> String {
        format!("<b>{}</b>", self.escaped())
    }

    fn italics(&self) -> String {
        format!("<i>{}</i>", self.escaped())
    }

    fn code(&self) -> String {
        format!("<code>{}</code>", self.escaped())
    }

    fn pre(&self) -> String {
        format!("<pre>{}</pre>", self.escaped())
    }

    fn url(&self, href: impl Display) -> String {
        format!("<a href=\"{href}\">{}</a>", self.escaped())
    }
}
