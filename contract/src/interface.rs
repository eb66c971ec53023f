//! The validated petition contract interface.

use alloy_dyn_abi::DynSolType;

use crate::abi::{is_string, is_uint, param_type, parse_abi, Function, Param};
use crate::error::ContractError;

/// ABI of the deployed petition contract.
pub const DEFAULT_ABI: &str = r#"[
  {
    "type": "function",
    "name": "petitionsCount",
    "inputs": [],
    "outputs": [{ "name": "", "type": "uint256" }],
    "stateMutability": "view"
  },
  {
    "type": "function",
    "name": "petitions",
    "inputs": [{ "name": "", "type": "uint256" }],
    "outputs": [
      { "name": "name", "type": "string" },
      { "name": "voteCount", "type": "uint256" }
    ],
    "stateMutability": "view"
  },
  {
    "type": "function",
    "name": "totalVotes",
    "inputs": [],
    "outputs": [{ "name": "", "type": "uint256" }],
    "stateMutability": "view"
  },
  {
    "type": "function",
    "name": "vote",
    "inputs": [{ "name": "_petitionId", "type": "uint256" }],
    "outputs": [],
    "stateMutability": "nonpayable"
  }
]"#;

/// The four entry points the client uses, resolved from a JSON ABI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PetitionInterface {
    pub petitions_count: Function,
    pub petitions: Function,
    pub total_votes: Function,
    pub vote: Function,
    name_output: usize,
    vote_count_output: usize,
}

/// Position of the output called `name`, else the first output of the kind.
fn output_index(
    outputs: &[DynSolType],
    params: &[Param],
    name: &str,
    kind: fn(&DynSolType) -> bool,
) -> Option<usize> {
    params
        .iter()
        .zip(outputs)
        .position(|(p, t)| p.name == name && kind(t))
        .or_else(|| outputs.iter().position(kind))
}

impl PetitionInterface {
    /// Resolve and check the entry points. Unrelated ABI entries are ignored.
    /// Extra outputs of any type are allowed on the four used here.
    pub fn parse(json: &str) -> Result<Self, ContractError> {
        let abi = parse_abi(json)?;
        type Resolved = (Function, Vec<DynSolType>);
        let find = |name: &str, inputs: usize| -> Result<Resolved, ContractError> {
            let function = abi
                .function(name)
                .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == inputs))
                .ok_or_else(|| ContractError::MissingFunction(name.to_string()))?;
            for input in &function.inputs {
                if !is_uint(&param_type(input)?) {
                    return Err(ContractError::InvalidInterface(format!(
                        "`{}` has unexpected inputs",
                        function.signature()
                    )));
                }
            }
            let outputs = function
                .outputs
                .iter()
                .map(param_type)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((function.clone(), outputs))
        };

        let (petitions_count, count_outputs) = find("petitionsCount", 0)?;
        let (petitions, petition_outputs) = find("petitions", 1)?;
        let (total_votes, total_outputs) = find("totalVotes", 0)?;
        let (vote, _) = find("vote", 1)?;

        let scalars = [(&petitions_count, &count_outputs), (&total_votes, &total_outputs)];
        for (scalar, outputs) in scalars {
            if !outputs.first().is_some_and(is_uint) {
                return Err(ContractError::InvalidInterface(format!(
                    "`{}` must return an unsigned integer",
                    scalar.signature()
                )));
            }
        }

        let outputs = &petitions.outputs;
        let name_output = output_index(&petition_outputs, outputs, "name", is_string)
            .ok_or_else(|| {
                ContractError::InvalidInterface("`petitions` has no string name output".into())
            })?;
        let vote_count_output = output_index(&petition_outputs, outputs, "voteCount", is_uint)
            .ok_or_else(|| {
                ContractError::InvalidInterface("`petitions` has no voteCount output".into())
            })?;

        Ok(Self {
            petitions_count,
            petitions,
            total_votes,
            vote,
            name_output,
            vote_count_output,
        })
    }

    /// Output positions of `name` and `voteCount` in a `petitions(id)` result.
    pub fn petition_fields(&self) -> (usize, usize) {
        (self.name_output, self.vote_count_output)
    }
}
