use std::fmt::Display;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::types::ChainId;

/// An EVM network the payment contract may be deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmNetwork {
    pub name: &'static str,
    pub chain_id: ChainId,
}

impl EvmNetwork {
    /// Look up a known network by chain id.
    pub fn from_chain_id(chain_id: ChainId) -> Option<EvmNetwork> {
        networks::ALL
            .iter()
            .copied()
            .find(|network| network.chain_id == chain_id)
    }

    /// Human readable chain label, falling back to `eip155:<id>` for unknown chains.
    pub fn label(chain_id: ChainId) -> String {
        match EvmNetwork::from_chain_id(chain_id) {
            Some(network) => network.name.to_string(),
            None => format!("eip155:{chain_id}"),
        }
    }
}

pub trait ExplicitEvmNetwork {
    const NETWORK: EvmNetwork;
}

impl<T> From<T> for EvmNetwork
where
    T: ExplicitEvmNetwork,
{
    fn from(_: T) -> Self {
        T::NETWORK
    }
}

/// The asset a sub-payment moves.
///
/// On the wire the native asset is the zero address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Token {
    #[default]
    Native,
    Erc20(Address),
}

impl Token {
    /// The sentinel address denoting the native asset.
    pub const NATIVE_SENTINEL: Address = Address::ZERO;

    pub fn address(&self) -> Address {
        match self {
            Token::Native => Token::NATIVE_SENTINEL,
            Token::Erc20(address) => *address,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Token::Native)
    }
}

impl From<Address> for Token {
    fn from(address: Address) -> Self {
        if address == Token::NATIVE_SENTINEL {
            Token::Native
        } else {
            Token::Erc20(address)
        }
    }
}

impl From<Option<Address>> for Token {
    fn from(address: Option<Address>) -> Self {
        address.map(Token::from).unwrap_or_default()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Native => write!(f, "native"),
            Token::Erc20(address) => write!(f, "{address}"),
        }
    }
}

impl Serialize for Token {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.address().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Address::deserialize(deserializer).map(Token::from)
    }
}

pub mod networks {
    use super::*;

    macro_rules! define_explicit_evm_network {
        ($struct_name:ident, $network_const:expr) => {
            pub struct $struct_name;

            impl ExplicitEvmNetwork for $struct_name {
                const NETWORK: EvmNetwork = $network_const;
            }
        };
    }

    define_explicit_evm_network!(
        Ethereum,
        EvmNetwork {
            name: "ethereum",
            chain_id: 1,
        }
    );
    define_explicit_evm_network!(
        EthereumSepolia,
        EvmNetwork {
            name: "ethereum-sepolia",
            chain_id: 11155111,
        }
    );
    define_explicit_evm_network!(
        OptimismGoerli,
        EvmNetwork {
            name: "optimism-goerli",
            chain_id: 420,
        }
    );
    define_explicit_evm_network!(
        ArbitrumGoerli,
        EvmNetwork {
            name: "arbitrum-goerli",
            chain_id: 421613,
        }
    );
    define_explicit_evm_network!(
        Base,
        EvmNetwork {
            name: "base",
            chain_id: 8453,
        }
    );
    define_explicit_evm_network!(
        BaseSepolia,
        EvmNetwork {
            name: "base-sepolia",
            chain_id: 84532,
        }
    );

    pub(super) const ALL: [EvmNetwork; 6] = [
        Ethereum::NETWORK,
        EthereumSepolia::NETWORK,
        OptimismGoerli::NETWORK,
        ArbitrumGoerli::NETWORK,
        Base::NETWORK,
        BaseSepolia::NETWORK,
    ];
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_known_network_lookup() {
        let network = EvmNetwork::from_chain_id(421613).unwrap();
        assert_eq!(network, networks::ArbitrumGoerli::NETWORK);
        assert_eq!(EvmNetwork::label(11155111), "ethereum-sepolia");
        assert_eq!(EvmNetwork::label(31337), "eip155:31337");
        assert_eq!(EvmNetwork::from(networks::BaseSepolia).chain_id, 84532);
    }

    #[test]
    fn test_zero_address_is_native() {
        assert_eq!(Token::from(Address::ZERO), Token::Native);
        assert_eq!(Token::from(None), Token::Native);
        assert_eq!(Token::Native.address(), Address::ZERO);
    }

    #[test]
    fn test_erc20_round_trips_address() {
        let usdc = address!("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");
        let token = Token::from(Some(usdc));
        assert_eq!(token, Token::Erc20(usdc));
        assert_eq!(token.address(), usdc);
        assert!(!token.is_native());
    }
}
