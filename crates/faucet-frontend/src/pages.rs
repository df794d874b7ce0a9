//! Server-rendered HTML for the home page and claim form.

use faucet_core::{ChainOption, ChainSelection};
use std::fmt::Write;

/// User-facing outcome banner. Diagnostics never go here, only to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ClaimSucceeded,
    ClaimFailed,
    InvalidChain,
    LoginFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::ClaimSucceeded => "Funds claimed successfully",
            Notice::ClaimFailed => "Error claiming funds: please try again later",
            Notice::InvalidChain => "Unknown chain selected",
            Notice::LoginFailed => "Login failed: please try again",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            Notice::ClaimSucceeded => "notice notice-success",
            _ => "notice notice-error",
        }
    }
}

/// Current values of the claim form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub chain: ChainSelection,
    pub address: String,
    pub only_native_token: bool,
}

impl FormState {
    /// Fresh form: first configured chain, empty address
    pub fn initial(chains: &[ChainOption], only_native_token: bool) -> Self {
        Self {
            chain: chains.first().map(ChainOption::chain).unwrap_or_default(),
            address: String::new(),
            only_native_token,
        }
    }
}

/// Everything the home page needs to render
#[derive(Debug)]
pub struct HomePage<'a> {
    pub authenticated: bool,
    pub chains: &'a [ChainOption],
    pub form: &'a FormState,
    pub notice: Option<Notice>,
}

impl HomePage<'_> {
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(2048);

        html.push_str(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Faucet</title>\n</head>\n<body>\n\
             <div style=\"margin: 32px; padding: 32px\">\n",
        );

        if let Some(notice) = self.notice {
            let _ = writeln!(
                html,
                "<p class=\"{}\" role=\"status\">{}</p>",
                notice.class(),
                notice.message()
            );
        }

        if self.authenticated {
            html.push_str(
                "<form method=\"post\" action=\"/logout\">\
                 <button class=\"logout-button\" type=\"submit\">Log out</button></form>\n",
            );
        } else {
            html.push_str(
                "<a class=\"twitter-auth-button\" href=\"/login\">Log in with Twitter</a>\n",
            );
        }

        self.render_form(&mut html);

        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    fn render_form(&self, html: &mut String) {
        html.push_str("<form class=\"claim-funds-form\" method=\"post\" action=\"/claim\">\n");
        html.push_str("<label for=\"chain\">Chain:</label>\n");
        html.push_str("<select class=\"chain-selector\" id=\"chain\" name=\"chain\">\n");
        for option in self.chains {
            let chain = option.chain();
            let selected = if chain == self.form.chain { " selected" } else { "" };
            let _ = writeln!(
                html,
                "<option value=\"{}\"{}>{}</option>",
                escape(&chain.form_value()),
                selected,
                escape(&option.name)
            );
        }
        html.push_str("</select>\n");

        html.push_str("<label for=\"address\">Address:</label>\n");
        let _ = writeln!(
            html,
            "<input type=\"text\" id=\"address\" name=\"address\" value=\"{}\">",
            escape(&self.form.address)
        );

        let _ = writeln!(
            html,
            "<input id=\"only-native-token\" name=\"only_native_token\" type=\"checkbox\"{}>",
            if self.form.only_native_token { " checked" } else { "" }
        );
        let _ = writeln!(
            html,
            "<label for=\"only-native-token\">{}</label>",
            if self.form.only_native_token {
                "Only Native Token"
            } else {
                "ERC20/Assets Tokens"
            }
        );

        let _ = writeln!(
            html,
            "<button class=\"submit-button\" type=\"submit\"{}>Claim</button>",
            if self.authenticated { "" } else { " disabled" }
        );
        html.push_str("</form>\n");
    }
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use faucet_core::chain::default_catalogue;

    fn render(authenticated: bool, form: &FormState, notice: Option<Notice>) -> String {
        let chains = default_catalogue();
        HomePage {
            authenticated,
            chains: &chains,
            form,
            notice,
        }
        .render()
    }

    #[test]
    fn test_unauthenticated_page() {
        let form = FormState::initial(&default_catalogue(), true);
        let html = render(false, &form, None);

        assert!(html.contains("Log in with Twitter"));
        assert!(html.contains("type=\"submit\" disabled>Claim"));
        assert!(!html.contains("Log out"));
        assert!(!html.contains("class=\"notice"));
    }

    #[test]
    fn test_authenticated_page() {
        let form = FormState::initial(&default_catalogue(), true);
        let html = render(true, &form, None);

        assert!(!html.contains("Log in with Twitter"));
        assert!(html.contains("type=\"submit\">Claim"));
        assert!(html.contains("Log out"));
    }

    #[test]
    fn test_default_chain_selected() {
        let form = FormState::initial(&default_catalogue(), true);
        let html = render(false, &form, None);

        assert!(html.contains("<option value=\"{&quot;Evm&quot;:3884533461}\" selected>Athena</option>"));
        assert!(html.contains("<option value=\"{&quot;Substrate&quot;:1081}\">Tangle</option>"));
    }

    #[test]
    fn test_native_token_label() {
        let mut form = FormState::initial(&default_catalogue(), true);
        let html = render(true, &form, None);
        assert!(html.contains("checked>"));
        assert!(html.contains("Only Native Token"));

        form.only_native_token = false;
        let html = render(true, &form, None);
        assert!(!html.contains("checked>"));
        assert!(html.contains("ERC20/Assets Tokens"));
    }

    #[test]
    fn test_address_is_escaped() {
        let mut form = FormState::initial(&default_catalogue(), true);
        form.address = "\"><script>alert(1)</script>".to_string();
        let html = render(true, &form, None);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_notice_rendering() {
        let form = FormState::initial(&default_catalogue(), true);

        let html = render(true, &form, Some(Notice::ClaimSucceeded));
        assert!(html.contains("notice-success"));
        assert!(html.contains("Funds claimed successfully"));

        let html = render(true, &form, Some(Notice::ClaimFailed));
        assert!(html.contains("notice-error"));
        assert!(html.contains("Error claiming funds"));
    }

    #[test]
    fn test_initial_form_with_empty_catalogue() {
        let form = FormState::initial(&[], false);
        assert_eq!(form.chain, ChainSelection::default());
        assert!(!form.only_native_token);
    }
}
