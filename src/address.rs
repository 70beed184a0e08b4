use std::{error, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Bitcoin,
    Ethereum,
}

impl Chain {
    /// Prefix of the exported file name.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "btc",
            Chain::Ethereum => "eth",
        }
    }

    pub fn ticker(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "BTC",
            Chain::Ethereum => "ETH",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match &self {
            Chain::Bitcoin => "bitcoin",
            Chain::Ethereum => "ethereum",
        };
        write!(f, "{}", str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub chain: Chain,
    pub raw: String,
}

impl Address {
    /// Key under which the explorer returns this address in its `data` object.
    pub fn lookup_key(&self) -> String {
        match self.chain {
            Chain::Ethereum => self.raw.to_lowercase(),
            Chain::Bitcoin => self.raw.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnrecognizedAddress(pub String);

impl fmt::Display for UnrecognizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unrecognized address format: {:?}, please check input address format",
            self.0
        )
    }
}

impl error::Error for UnrecognizedAddress {}

/*
  Only the prefix picks the chain, the explorer decides whether the address actually exists.
  Base58, bech32 and hex are all alphanumeric, anything else would end up in a url path and a
  file name.
*/
pub fn classify(input: &str) -> Result<Address, UnrecognizedAddress> {
    let raw = input.trim();

    if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(UnrecognizedAddress(input.to_string()));
    }

    let chain = if raw.starts_with("0x") {
        Chain::Ethereum
    } else if raw.starts_with("bc1") || raw.starts_with('1') || raw.starts_with('3') {
        Chain::Bitcoin
    } else {
        return Err(UnrecognizedAddress(input.to_string()));
    };

    Ok(Address {
        chain,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_prefix() {
        let cases = [
            ("0xde0B295669a9FD93d5F28D9Ec85E40f4cb697BAe", Chain::Ethereum),
            ("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", Chain::Bitcoin),
            ("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", Chain::Bitcoin),
            ("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy", Chain::Bitcoin),
        ];

        for (input, chain) in cases {
            assert_eq!(classify(input).unwrap().chain, chain, "{}", input);
        }
    }

    #[test]
    fn rejects_unknown_prefixes() {
        assert!(classify("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx").is_err());
        assert!(classify("LZ3y4Mz2Vg5pAa8cQfJ9tFqYq3bA1c2d3e").is_err());
        assert!(classify("").is_err());
    }

    #[test]
    fn rejects_path_and_query_characters() {
        for input in [
            "1x/../../y",
            "1x\\..\\y",
            "0xabc?limit=1",
            "0xabc#frag",
            "3abc.def",
            "bc1 q",
        ] {
            assert!(classify(input).is_err(), "{}", input);
        }
    }

    #[test]
    fn trims_whitespace() {
        let address = classify("  1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa\n").unwrap();
        assert_eq!(address.raw, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
    }

    #[test]
    fn ethereum_lookup_key_is_lowercase() {
        let address = classify("0xDE0b295669a9FD93d5F28D9Ec85E40f4cb697BAe").unwrap();
        assert_eq!(
            address.lookup_key(),
            "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae"
        );

        let address = classify("bc1qAR0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq").unwrap();
        assert_eq!(address.lookup_key(), address.raw);
    }
}
