//! Console dialog content.
//!
//! Each dialog is fixed metadata. [`compose_dialog`] turns it into the
//! payload the templates render, swapping the primary action for a sign-in
//! action when the dialog is gated and the caller is anonymous.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ServerError;

/// What a button does when pressed
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ButtonAction {
    /// Navigate somewhere
    Link { href: String, external: bool },
    /// Dismiss the dialog
    Close,
    /// Start the caller-supplied login flow
    SignIn,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonSpec {
    pub label: String,
    pub action: ButtonAction,
}

impl ButtonSpec {
    pub fn link(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            action: ButtonAction::Link {
                href: href.to_string(),
                external: false,
            },
        }
    }

    pub fn external(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            action: ButtonAction::Link {
                href: href.to_string(),
                external: true,
            },
        }
    }

    pub fn close(label: &str) -> Self {
        Self {
            label: label.to_string(),
            action: ButtonAction::Close,
        }
    }

    pub fn sign_in(label: &str) -> Self {
        Self {
            label: label.to_string(),
            action: ButtonAction::SignIn,
        }
    }
}

/// Fixed description of a dialog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogMetadata {
    pub label: String,
    pub title: String,
    pub description: String,
    pub primary_button: ButtonSpec,
    pub secondary_button: Option<ButtonSpec>,
    /// Label of the sign-in action shown to anonymous callers. `None` = not gated.
    pub sign_in_label: Option<String>,
}

/// Whether the caller is signed in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Anonymous,
}

impl AuthStatus {
    pub fn is_authenticated(self) -> bool {
        matches!(self, AuthStatus::Authenticated)
    }
}

impl From<bool> for AuthStatus {
    fn from(authenticated: bool) -> Self {
        if authenticated {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }
}

/// Renderable dialog payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DialogContent {
    pub label: String,
    pub title: String,
    pub description: String,
    pub primary_button: ButtonSpec,
    pub secondary_button: Option<ButtonSpec>,
}

/// Compose a dialog for a caller
pub fn compose_dialog(metadata: &DialogMetadata, auth: AuthStatus) -> DialogContent {
    let primary_button = match (&metadata.sign_in_label, auth) {
        (Some(sign_in_label), AuthStatus::Anonymous) => ButtonSpec::sign_in(sign_in_label),
        _ => metadata.primary_button.clone(),
    };

    DialogContent {
        label: metadata.label.clone(),
        title: metadata.title.clone(),
        description: metadata.description.clone(),
        primary_button,
        secondary_button: metadata.secondary_button.clone(),
    }
}

/// The console's dialogs, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogKind {
    TestnetPaymaster,
    UxReview,
    SuperchainSafe,
    DeploymentRebate,
    MainnetPaymaster,
    Megaphone,
    UserFeedback,
}

const SIGN_IN_TO_APPLY: &str = "Sign in to apply";

impl DialogKind {
    pub const ALL: [DialogKind; 7] = [
        DialogKind::TestnetPaymaster,
        DialogKind::UxReview,
        DialogKind::SuperchainSafe,
        DialogKind::DeploymentRebate,
        DialogKind::MainnetPaymaster,
        DialogKind::Megaphone,
        DialogKind::UserFeedback,
    ];

    /// URL slug
    pub fn slug(self) -> &'static str {
        match self {
            DialogKind::TestnetPaymaster => "testnet-paymaster",
            DialogKind::UxReview => "ux-review",
            DialogKind::SuperchainSafe => "superchain-safe",
            DialogKind::DeploymentRebate => "deployment-rebate",
            DialogKind::MainnetPaymaster => "mainnet-paymaster",
            DialogKind::Megaphone => "megaphone",
            DialogKind::UserFeedback => "user-feedback",
        }
    }

    pub fn metadata(self) -> DialogMetadata {
        match self {
            DialogKind::TestnetPaymaster => DialogMetadata {
                label: "Testnet".to_string(),
                title: "Testnet Paymaster".to_string(),
                description: "Get your testnet transactions sponsored so users can try your \
                              app without holding testnet ETH."
                    .to_string(),
                primary_button: ButtonSpec::link("Get started", "/console/paymaster/testnet"),
                secondary_button: Some(ButtonSpec::close("Close")),
                sign_in_label: None,
            },
            DialogKind::UxReview => DialogMetadata {
                label: "Growth".to_string(),
                title: "Get a UX review".to_string(),
                description: "Have designers walk through your app and send back concrete \
                              suggestions for onboarding and transaction flows."
                    .to_string(),
                primary_button: ButtonSpec::link("Apply", "/console/apply/ux-review"),
                secondary_button: Some(ButtonSpec::close("Maybe later")),
                sign_in_label: Some(SIGN_IN_TO_APPLY.to_string()),
            },
            DialogKind::SuperchainSafe => DialogMetadata {
                label: "Tools".to_string(),
                title: "Superchain Safe".to_string(),
                description: "Manage multisig wallets across every chain in the Superchain \
                              from a single interface."
                    .to_string(),
                primary_button: ButtonSpec::external("Open Safe", "/console/redirect/safe"),
                secondary_button: Some(ButtonSpec::close("Close")),
                sign_in_label: None,
            },
            DialogKind::DeploymentRebate => DialogMetadata {
                label: "Rewards".to_string(),
                title: "Deployment rebate".to_string(),
                description: "Get reimbursed for the gas spent deploying your contracts to \
                              mainnet."
                    .to_string(),
                primary_button: ButtonSpec::link("Claim rebate", "/console/rebates"),
                secondary_button: Some(ButtonSpec::close("Close")),
                sign_in_label: Some(SIGN_IN_TO_APPLY.to_string()),
            },
            DialogKind::MainnetPaymaster => DialogMetadata {
                label: "Coming soon".to_string(),
                title: "Mainnet Paymaster".to_string(),
                description: "Sponsor your users' mainnet transactions. Join the waitlist to \
                              get early access."
                    .to_string(),
                primary_button: ButtonSpec::link("Join waitlist", "/console/paymaster/waitlist"),
                secondary_button: Some(ButtonSpec::close("Close")),
                sign_in_label: Some("Sign in to join waitlist".to_string()),
            },
            DialogKind::Megaphone => DialogMetadata {
                label: "Growth".to_string(),
                title: "Megaphone".to_string(),
                description: "Apply to have your app promoted across ecosystem channels and \
                              newsletters."
                    .to_string(),
                primary_button: ButtonSpec::link("Apply", "/console/apply/megaphone"),
                secondary_button: Some(ButtonSpec::close("Maybe later")),
                sign_in_label: Some(SIGN_IN_TO_APPLY.to_string()),
            },
            DialogKind::UserFeedback => DialogMetadata {
                label: "Growth".to_string(),
                title: "Get user feedback".to_string(),
                description: "Put your app in front of real users and receive recorded \
                              sessions with their feedback."
                    .to_string(),
                primary_button: ButtonSpec::link("Apply", "/console/apply/user-feedback"),
                secondary_button: Some(ButtonSpec::close("Maybe later")),
                sign_in_label: Some(SIGN_IN_TO_APPLY.to_string()),
            },
        }
    }

    pub fn compose(self, auth: AuthStatus) -> DialogContent {
        compose_dialog(&self.metadata(), auth)
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DialogKind {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DialogKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| ServerError::DialogNotFound(s.to_string()))
    }
}

/// Every dialog composed for one caller, in display order
pub fn compose_all(auth: AuthStatus) -> Vec<(DialogKind, DialogContent)> {
    DialogKind::ALL
        .into_iter()
        .map(|kind| (kind, kind.compose(auth)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated_metadata() -> DialogMetadata {
        DialogMetadata {
            label: "Label".to_string(),
            title: "Title".to_string(),
            description: "Description".to_string(),
            primary_button: ButtonSpec::link("Apply", "/apply"),
            secondary_button: Some(ButtonSpec::close("Close")),
            sign_in_label: Some("Sign in first".to_string()),
        }
    }

    #[test]
    fn test_anonymous_gets_sign_in_action() {
        let metadata = gated_metadata();
        let content = compose_dialog(&metadata, AuthStatus::Anonymous);

        assert_eq!(content.primary_button, ButtonSpec::sign_in("Sign in first"));
        assert_eq!(content.label, metadata.label);
        assert_eq!(content.title, metadata.title);
        assert_eq!(content.description, metadata.description);
        assert_eq!(content.secondary_button, metadata.secondary_button);
    }

    #[test]
    fn test_authenticated_keeps_primary_action() {
        let metadata = gated_metadata();
        let content = compose_dialog(&metadata, AuthStatus::Authenticated);

        assert_eq!(content.primary_button, metadata.primary_button);
        assert_eq!(content.secondary_button, metadata.secondary_button);
    }

    #[test]
    fn test_ungated_dialog_ignores_auth() {
        let mut metadata = gated_metadata();
        metadata.sign_in_label = None;

        assert_eq!(
            compose_dialog(&metadata, AuthStatus::Anonymous),
            compose_dialog(&metadata, AuthStatus::Authenticated)
        );
    }

    #[test]
    fn test_catalogue_gating() {
        let gated: Vec<DialogKind> = DialogKind::ALL
            .into_iter()
            .filter(|kind| kind.metadata().sign_in_label.is_some())
            .collect();
        assert_eq!(
            gated,
            vec![
                DialogKind::UxReview,
                DialogKind::DeploymentRebate,
                DialogKind::MainnetPaymaster,
                DialogKind::Megaphone,
                DialogKind::UserFeedback,
            ]
        );

        let waitlist = DialogKind::MainnetPaymaster.compose(AuthStatus::Anonymous);
        assert_eq!(waitlist.primary_button.label, "Sign in to join waitlist");
        assert_eq!(waitlist.primary_button.action, ButtonAction::SignIn);

        let safe = DialogKind::SuperchainSafe.compose(AuthStatus::Anonymous);
        assert_ne!(safe.primary_button.action, ButtonAction::SignIn);
    }

    #[test]
    fn test_compose_all_in_order() {
        let all = compose_all(AuthStatus::Authenticated);
        let kinds: Vec<DialogKind> = all.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, DialogKind::ALL.to_vec());
        assert!(all
            .iter()
            .all(|(_, content)| content.primary_button.action != ButtonAction::SignIn));
    }

    #[test]
    fn test_slug_round_trip_and_unknown() {
        for kind in DialogKind::ALL {
            assert_eq!(kind.slug().parse::<DialogKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.slug());
        }
        assert!(matches!(
            "nope".parse::<DialogKind>(),
            Err(ServerError::DialogNotFound(_))
        ));
    }

    #[test]
    fn test_button_json_shape() {
        let json = serde_json::to_value(ButtonSpec::external("Open", "/x")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "label": "Open",
                "action": { "kind": "link", "href": "/x", "external": true }
            })
        );
        let json = serde_json::to_value(ButtonSpec::sign_in("Sign in")).unwrap();
        assert_eq!(json["action"]["kind"], "sign_in");
    }
}
