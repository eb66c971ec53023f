//! Dependency edges between pieces of client state.
//!
//! ```text
//! WalletSession ──▶ ContractHandle ──▶ PetitionList
//!                                  └─▶ VoteTally
//! ```
//!
//! When a node changes, each node directly downstream of it is rebuilt by
//! the effect returned from [`recompute`]. Nodes further down are rebuilt
//! once their own upstream change has been applied.

use crate::event::Effect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    WalletSession,
    ContractHandle,
    PetitionList,
    VoteTally,
}

pub const EDGES: &[(Node, Node)] = &[
    (Node::WalletSession, Node::ContractHandle),
    (Node::ContractHandle, Node::PetitionList),
    (Node::ContractHandle, Node::VoteTally),
];

pub fn downstream(node: Node) -> impl Iterator<Item = Node> {
    EDGES
        .iter()
        .filter(move |(from, _)| *from == node)
        .map(|(_, to)| *to)
}

/// The effect that rebuilds `node`. The session itself is an input, not derived.
pub fn rebuild(node: Node) -> Option<Effect> {
    match node {
        Node::WalletSession => None,
        Node::ContractHandle => Some(Effect::Bind),
        Node::PetitionList => Some(Effect::RefreshPetitions),
        Node::VoteTally => Some(Effect::RefreshTotalVotes),
    }
}

/// Effects to run after `changed` was replaced, in edge order.
pub fn recompute(changed: Node) -> Vec<Effect> {
    downstream(changed).filter_map(rebuild).collect()
}
