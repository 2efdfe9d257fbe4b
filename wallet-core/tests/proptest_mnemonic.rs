use proptest::prelude::*;

use hdwallet_core::config::CodecConfig;
use hdwallet_core::crypto::{
    Bip39Codec, ElectrumV1Codec, ElectrumV2Codec, ElectrumV2Type, Entropy, EntropyScheme, Language,
    MoneroCodec, Slip39Codec, WordlistKind, Wordlists,
};
use hdwallet_core::error::{MnemonicError, WalletError};

/// Placeholder list with unique three-letter prefixes ("aaaum", "aabum", ...).
fn synthetic_words(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let letter = |n: usize| (b'a' + n as u8) as char;
            format!("{}{}{}um", letter(i / 676), letter(i / 26 % 26), letter(i % 26))
        })
        .collect()
}

fn synthetic_lists() -> Wordlists {
    Wordlists::builtin()
        .with_words(Language::English, WordlistKind::ElectrumV1, synthetic_words(1626))
        .unwrap()
        .with_words(Language::English, WordlistKind::Monero, synthetic_words(1626))
        .unwrap()
        .with_words(Language::English, WordlistKind::Slip39, synthetic_words(1024))
        .unwrap()
}

fn bip39_entropy() -> impl Strategy<Value = Vec<u8>> {
    prop::sample::select(vec![16usize, 20, 24, 28, 32])
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bip39_round_trip_matches_reference_encoder(bytes in bip39_entropy()) {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let entropy = Entropy::from_bytes(EntropyScheme::Bip39, &bytes).unwrap();

        let mnemonic = codec.encode(&entropy, Language::English).unwrap();
        let reference = bip39::Mnemonic::from_entropy(&bytes).unwrap();
        prop_assert_eq!(mnemonic.phrase(), reference.to_string());
        prop_assert_eq!(mnemonic.word_count(), bytes.len() * 3 / 4);

        let decoded = codec.decode(&mnemonic.phrase(), None).unwrap();
        prop_assert_eq!(decoded.bytes(), &bytes[..]);
    }

    #[test]
    fn bip39_messy_input_parses_to_canonical(bytes in prop::array::uniform16(any::<u8>())) {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let entropy = Entropy::from_bytes(EntropyScheme::Bip39, bytes).unwrap();
        let mnemonic = codec.encode(&entropy, Language::English).unwrap();

        let messy = format!("  {}  ", mnemonic.words().join("   ").to_uppercase());
        prop_assert_eq!(codec.parse(&messy, None).unwrap(), mnemonic);
    }

    #[test]
    fn electrum_v1_round_trip(bytes in prop::array::uniform16(any::<u8>())) {
        let lists = synthetic_lists();
        let codec = ElectrumV1Codec::new(&lists);
        let entropy = Entropy::from_bytes(EntropyScheme::ElectrumV1, bytes).unwrap();

        let mnemonic = codec.encode(&entropy).unwrap();
        prop_assert_eq!(mnemonic.word_count(), 12);
        prop_assert_eq!(codec.decode(&mnemonic.phrase()).unwrap(), entropy);
    }

    #[test]
    fn monero_round_trip(bytes in prop::array::uniform32(any::<u8>()), checksum in any::<bool>()) {
        let lists = synthetic_lists();
        let codec = MoneroCodec::new(&lists);
        let entropy = Entropy::from_bytes(EntropyScheme::Monero, bytes).unwrap();

        let mnemonic = codec.encode(&entropy, Language::English, checksum).unwrap();
        prop_assert_eq!(mnemonic.word_count(), if checksum { 25 } else { 24 });
        prop_assert_eq!(codec.decode(&mnemonic.phrase(), None).unwrap(), entropy);
    }

    #[test]
    fn electrum_v2_encoding_is_stable(top in 1u8..16, rest in prop::array::uniform16(any::<u8>())) {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists);
        let mut bytes = vec![top];
        bytes.extend_from_slice(&rest);
        let entropy = Entropy::from_bytes(EntropyScheme::ElectrumV2, &bytes).unwrap();
        prop_assert_eq!(entropy.strength(), 132);

        let mnemonic = codec.encode(&entropy, Language::English, ElectrumV2Type::Standard).unwrap();
        prop_assert_eq!(mnemonic.word_count(), 12);
        prop_assert_eq!(codec.mnemonic_type(&mnemonic.phrase()).unwrap(), ElectrumV2Type::Standard);
        prop_assert!(!Bip39Codec::new(&lists).is_valid(&mnemonic.phrase(), None));

        // The found entropy encodes to itself
        let found = codec.decode(&mnemonic.phrase(), None, None).unwrap();
        let again = codec.encode(&found, Language::English, ElectrumV2Type::Standard).unwrap();
        prop_assert_eq!(again, mnemonic);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn slip39_round_trip(bytes in prop::array::uniform16(any::<u8>()), identifier in 0u16..0x8000) {
        let lists = synthetic_lists();
        let config = CodecConfig {
            slip39_iteration_exponent: 0,
            ..CodecConfig::default()
        };
        let codec = Slip39Codec::from_config(&lists, &config);
        let entropy = Entropy::from_bytes(EntropyScheme::Slip39, bytes).unwrap();

        let share = codec.encode_with(&entropy, "TREZOR", identifier).unwrap();
        prop_assert_eq!(share.word_count(), 20);
        prop_assert_eq!(codec.decode(&share.phrase(), "TREZOR").unwrap(), entropy.clone());
        prop_assert!(codec.decode(&share.phrase(), "other").unwrap() != entropy);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn bip39_checksum_rejects_word_substitution(
        bytes in bip39_entropy(),
        position in any::<prop::sample::Index>(),
        replacement in 0usize..2048,
    ) {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let entropy = Entropy::from_bytes(EntropyScheme::Bip39, &bytes).unwrap();
        let mut words = codec.encode(&entropy, Language::English).unwrap().words().to_vec();

        let position = position.index(words.len());
        let word = bip39::Language::English.word_list()[replacement];
        prop_assume!(words[position] != word);
        words[position] = word.to_string();
        let text = words.join(" ");

        // Roughly one substitution in 2^(checksum bits) still verifies
        let reference = bip39::Mnemonic::parse_in(bip39::Language::English, &text);
        match codec.decode(&text, Some(Language::English)) {
            Ok(decoded) => {
                prop_assert!(reference.is_ok());
                prop_assert_ne!(decoded.bytes(), &bytes[..]);
                prop_assert_eq!(codec.encode(&decoded, Language::English).unwrap().phrase(), text);
            }
            Err(e) => {
                prop_assert!(reference.is_err());
                prop_assert_eq!(e, WalletError::Mnemonic(MnemonicError::ChecksumMismatch));
            }
        }
    }
}

#[test]
fn strength_closure() {
    for scheme in [
        EntropyScheme::Bip39,
        EntropyScheme::ElectrumV1,
        EntropyScheme::ElectrumV2,
        EntropyScheme::Monero,
        EntropyScheme::Slip39,
    ] {
        for &strength in scheme.strengths() {
            let entropy = Entropy::generate(scheme, strength).unwrap();
            assert_eq!(entropy.strength(), strength, "{}", scheme.name());
        }
        assert!(Entropy::generate(scheme, 100).is_err());
    }
}
