//! What to show, derived from client state.

use petition_types::{AccountAddress, PetitionId, VoteTally};
use std::fmt::Write as _;

use crate::state::{ClientState, Notice};

pub const TITLE: &str = "Welcome to the Nature Petition System!";
pub const FOOTER: &str = "© 2024 Nature Petition System. All Rights Reserved.";
pub const INSTALL_PROMPT: &str = "Please install MetaMask in order to use this Voting System.";
pub const CONNECT_PROMPT: &str = "Please connect your MetaMask wallet";
pub const GRID_HEADING: &str = "Choose a Petition and lock in your vote for our future:";

/// The four screens, in the order a session normally moves through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ViewState {
    NoWallet,
    WalletDetectedNoAccount,
    ConnectedNoContract,
    Ready,
}

impl ViewState {
    pub fn of(state: &ClientState) -> Self {
        if !state.wallet.has_provider() {
            Self::NoWallet
        } else if state.wallet.account().is_none() {
            Self::WalletDetectedNoAccount
        } else if state.contract.is_none() {
            Self::ConnectedNoContract
        } else {
            Self::Ready
        }
    }
}

/// One entry of the petition grid. Its vote action targets `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PetitionCard {
    pub id: PetitionId,
    pub name: String,
    pub vote_count: u64,
}

impl PetitionCard {
    pub fn vote_label(&self) -> String {
        format!("Vote for {}", self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    InstallPrompt,
    ConnectButton,
    /// Connected, no contract bound yet.
    Empty,
    Ready {
        petitions: Vec<PetitionCard>,
        /// `None` until the total has been read once.
        total_votes: Option<VoteTally>,
    },
}

/// A render-ready snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub title: &'static str,
    pub account: Option<AccountAddress>,
    pub screen: Screen,
    pub notice: Option<Notice>,
}

impl View {
    pub fn derive(state: &ClientState) -> Self {
        let screen = match ViewState::of(state) {
            ViewState::NoWallet => Screen::InstallPrompt,
            ViewState::WalletDetectedNoAccount => Screen::ConnectButton,
            ViewState::ConnectedNoContract => Screen::Empty,
            ViewState::Ready => Screen::Ready {
                petitions: state
                    .petitions
                    .iter()
                    .map(|p| PetitionCard {
                        id: p.id,
                        name: p.name.clone(),
                        vote_count: p.vote_count,
                    })
                    .collect(),
                total_votes: state.total_votes,
            },
        };
        Self {
            title: TITLE,
            account: state.wallet.account(),
            screen,
            notice: state.notice,
        }
    }

    pub fn state(&self) -> ViewState {
        match self.screen {
            Screen::InstallPrompt => ViewState::NoWallet,
            Screen::ConnectButton => ViewState::WalletDetectedNoAccount,
            Screen::Empty => ViewState::ConnectedNoContract,
            Screen::Ready { .. } => ViewState::Ready,
        }
    }

    /// Plain-text rendering: header, body, footer.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let account = self.account.map(|a| a.to_string()).unwrap_or_default();
        let _ = writeln!(out, "Connected Wallet: {account}");
        if let Some(notice) = &self.notice {
            let _ = writeln!(out, "[!] {notice}");
        }
        out.push('\n');

        match &self.screen {
            Screen::InstallPrompt => {
                let _ = writeln!(out, "{INSTALL_PROMPT}");
            }
            Screen::ConnectButton => {
                let _ = writeln!(out, "{CONNECT_PROMPT}");
            }
            Screen::Empty => {}
            Screen::Ready {
                petitions,
                total_votes,
            } => {
                let _ = writeln!(out, "{GRID_HEADING}");
                for card in petitions {
                    let _ = writeln!(out, "  {}", card.name);
                    let _ = writeln!(out, "    Votes: {}", card.vote_count);
                    let _ = writeln!(out, "    [{}]", card.vote_label());
                }
                if let Some(total) = total_votes {
                    let _ = writeln!(out, "Total Votes: {total}");
                }
            }
        }

        out.push('\n');
        out.push_str(FOOTER);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petition_contract::{ConfirmationPolicy, ContractBinding, DEFAULT_ABI};
    use petition_nullables::NullChain;
    use petition_types::PetitionList;
    use petition_wallet::WalletProvider;
    use std::sync::Arc;

    fn account() -> AccountAddress {
        AccountAddress::new([0xaa; 20])
    }

    fn with_provider() -> ClientState {
        let chain: Arc<NullChain> = Arc::new(NullChain::new());
        let provider: Arc<dyn WalletProvider> = chain;
        ClientState {
            wallet: ClientState::default().wallet.with_provider(provider),
            ..ClientState::default()
        }
    }

    fn ready() -> ClientState {
        let mut state = with_provider();
        state.wallet = state.wallet.with_accounts(&[account()]);
        let binding = ContractBinding::new(
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            DEFAULT_ABI,
            ConfirmationPolicy::default(),
        );
        state.contract = binding.bind(state.wallet.provider(), state.wallet.account()).unwrap();
        state.petitions = PetitionList::from_records([
            ("Clean Air".to_string(), 5),
            ("Save Forests".to_string(), 2),
            ("Ocean Cleanup".to_string(), 9),
        ]);
        state.total_votes = Some(VoteTally(16));
        state
    }

    #[test]
    fn states_follow_session_progress() {
        let empty = ClientState::default();
        assert_eq!(ViewState::of(&empty), ViewState::NoWallet);

        let detected = with_provider();
        assert_eq!(ViewState::of(&detected), ViewState::WalletDetectedNoAccount);

        let mut connected = detected.clone();
        connected.wallet = connected.wallet.with_accounts(&[account()]);
        assert_eq!(ViewState::of(&connected), ViewState::ConnectedNoContract);

        assert_eq!(ViewState::of(&ready()), ViewState::Ready);
        assert!(ViewState::NoWallet < ViewState::Ready);
    }

    #[test]
    fn no_wallet_renders_install_prompt() {
        let view = View::derive(&ClientState::default());
        assert_eq!(view.screen, Screen::InstallPrompt);
        let text = view.render_text();
        assert!(text.contains(INSTALL_PROMPT));
        assert!(text.contains("Connected Wallet: \n"));
        assert!(text.ends_with(&format!("{FOOTER}\n")));
    }

    #[test]
    fn detected_wallet_renders_connect_prompt() {
        let text = View::derive(&with_provider()).render_text();
        assert!(text.contains(CONNECT_PROMPT));
    }

    #[test]
    fn ready_renders_grid_and_total() {
        let view = View::derive(&ready());
        assert_eq!(view.state(), ViewState::Ready);
        let Screen::Ready { petitions, total_votes } = &view.screen else {
            panic!("expected grid");
        };
        assert_eq!(petitions.len(), 3);
        assert_eq!(petitions[1].vote_label(), "Vote for Save Forests");
        assert_eq!(*total_votes, Some(VoteTally(16)));

        let text = view.render_text();
        assert!(text.contains(&format!("Connected Wallet: {}", account())));
        assert!(text.contains(GRID_HEADING));
        assert!(text.contains("Votes: 9"));
        assert!(text.contains("Total Votes: 16"));
    }

    #[test]
    fn notice_is_shown_alongside_screen() {
        let mut state = with_provider();
        state.notice = Some(Notice::AuthorizationRejected);
        let view = View::derive(&state);
        assert_eq!(view.notice, Some(Notice::AuthorizationRejected));
        assert!(view.render_text().contains("Wallet connection was rejected"));
    }
}
