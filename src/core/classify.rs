// classify.rs - DNA / Protein / Unknown inference from residue alphabets

use crate::data::{is_missing, SequenceType};
use std::collections::BTreeSet;

/// Nucleotides plus IUPAC ambiguity codes
const DNA_ALPHABET: &[u8] = b"ACGTURYSWKMBDHVN";
/// 20 standard amino acids plus B, J, Z, X
const PROTEIN_ALPHABET: &[u8] = b"ACDEFGHIKLMNPQRSTVWYBJZX";
/// Residues that never occur in DNA
const PROTEIN_DISCRIMINATORS: &[u8] = b"FILPQEKRWYV";

fn in_alphabet(c: u8, alphabet: &[u8]) -> bool {
    alphabet.contains(&c)
}

/// Infer the residue type of one representative sequence.
///
/// Gap and unknown placeholders are ignored; an empty remainder is `Unknown`.
pub fn classify(sequence: &str) -> SequenceType {
    let residues: BTreeSet<u8> = sequence
        .bytes()
        .filter(|c| !is_missing(*c))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if residues.is_empty() {
        return SequenceType::Unknown;
    }

    let in_dna = residues.iter().all(|c| in_alphabet(*c, DNA_ALPHABET));
    let in_protein = residues.iter().all(|c| in_alphabet(*c, PROTEIN_ALPHABET));

    match (in_dna, in_protein) {
        (true, true) => {
            if residues.contains(&b'T') || residues.contains(&b'U') {
                SequenceType::Dna
            } else if residues
                .iter()
                .any(|c| in_alphabet(*c, PROTEIN_DISCRIMINATORS))
            {
                SequenceType::Protein
            } else {
                SequenceType::Unknown
            }
        }
        (true, false) => SequenceType::Dna,
        (false, true) => SequenceType::Protein,
        (false, false) => SequenceType::Unknown,
    }
}
