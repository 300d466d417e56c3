//! Binary encoding of automaton transitions.
//!
//! The diagram engine only sees bit strings; this module is the boundary
//! where automaton transitions become bit strings and back. A transition
//! `(source, symbol, target)` is encoded over
//! `num_alphabet_vars + num_nondet_vars` variables:
//!
//! - the symbol's code, big-endian, over the leading alphabet variables;
//! - a nondeterminism-choice index, big-endian, over the trailing
//!   variables, distinguishing multiple targets of the same
//!   (source, symbol) pair.
//!
//! Putting the choice bits last is deliberate: determinizing later means
//! projecting out a suffix of the variable order, which is cheap for the
//! consuming library.

use hashbrown::HashMap;
use log::debug;

use crate::error::{Error, Result};
use crate::mtbdd::MtBdd;
use crate::types::{Bit, BitString, Value, HI, LO, SINK_VALUE};

/// An automaton input symbol.
pub type Symbol = u64;

/// An automaton state. States double as terminal values and root names.
pub type State = Value;

/// Minimum code width distinguishing `n` values: `ceil(log2(n))`, 0 when
/// `n <= 1`.
pub fn bits_needed(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// Big-endian binary code of `value` over `num_bits` bits.
pub fn binary_code(value: u64, num_bits: usize) -> BitString {
    let mut code = vec![LO; num_bits];
    let mut rest = value;
    for i in 0..num_bits {
        if rest % 2 == 1 {
            code[num_bits - i - 1] = HI;
        }
        rest /= 2;
    }
    code
}

/// Bidirectional dictionary between alphabet symbols and fixed-width
/// binary codes.
///
/// Symbol `alphabet[i]` is assigned the big-endian code of `i` over the
/// minimum number of bits covering the whole alphabet.
#[derive(Debug)]
pub struct SymbolEncoder {
    encode_dict: HashMap<Symbol, BitString>,
    decode_dict: HashMap<BitString, Symbol>,
    num_alphabet_vars: usize,
}

impl SymbolEncoder {
    /// # Panics
    ///
    /// Panics if `alphabet` contains a symbol twice.
    pub fn new(alphabet: &[Symbol]) -> Self {
        let num_alphabet_vars = bits_needed(alphabet.len());
        let mut encode_dict = HashMap::with_capacity(alphabet.len());
        let mut decode_dict = HashMap::with_capacity(alphabet.len());
        for (i, &symbol) in alphabet.iter().enumerate() {
            let code = binary_code(i as u64, num_alphabet_vars);
            let prev = encode_dict.insert(symbol, code.clone());
            assert!(prev.is_none(), "Symbol {} occurs twice in the alphabet", symbol);
            decode_dict.insert(code, symbol);
        }
        Self {
            encode_dict,
            decode_dict,
            num_alphabet_vars,
        }
    }

    pub fn alphabet_size(&self) -> usize {
        self.encode_dict.len()
    }

    pub fn num_alphabet_vars(&self) -> usize {
        self.num_alphabet_vars
    }

    /// # Errors
    ///
    /// Fails if `symbol` is not in the alphabet.
    pub fn encode(&self, symbol: Symbol) -> Result<&BitString> {
        self.encode_dict.get(&symbol).ok_or(Error::UnknownSymbol(symbol))
    }

    /// # Errors
    ///
    /// Fails if `code` was not assigned to any symbol.
    pub fn decode(&self, code: &[Bit]) -> Result<Symbol> {
        self.decode_dict
            .get(code)
            .copied()
            .ok_or_else(|| Error::UnknownCode { code: code.to_vec() })
    }
}

/// The full bit layout of one encoded transition: alphabet bits followed by
/// nondeterminism-choice bits.
#[derive(Debug)]
pub struct TransitionEncoding {
    encoder: SymbolEncoder,
    num_nondet_vars: usize,
    nondeterminism_level: usize,
}

impl TransitionEncoding {
    /// `nondeterminism_level` is the maximum number of targets any
    /// (source, symbol) pair has; levels up to 1 need no choice bits.
    pub fn new(alphabet: &[Symbol], nondeterminism_level: usize) -> Self {
        let num_nondet_vars = if nondeterminism_level > 1 {
            bits_needed(nondeterminism_level)
        } else {
            0
        };
        Self {
            encoder: SymbolEncoder::new(alphabet),
            num_nondet_vars,
            nondeterminism_level,
        }
    }

    pub fn encoder(&self) -> &SymbolEncoder {
        &self.encoder
    }

    pub fn num_alphabet_vars(&self) -> usize {
        self.encoder.num_alphabet_vars()
    }

    pub fn num_nondet_vars(&self) -> usize {
        self.num_nondet_vars
    }

    /// Total variable count of diagrams using this encoding.
    pub fn num_vars(&self) -> usize {
        self.encoder.num_alphabet_vars() + self.num_nondet_vars
    }

    /// Whether the encoding uses no choice bits.
    pub fn is_deterministic(&self) -> bool {
        self.nondeterminism_level <= 1
    }

    /// Encodes the `choice`-th transition on `symbol` as a full-width bit
    /// string.
    ///
    /// # Errors
    ///
    /// Fails if `symbol` is not in the alphabet.
    pub fn encode(&self, symbol: Symbol, choice: usize) -> Result<BitString> {
        debug_assert!(
            self.num_nondet_vars > 0 || choice == 0,
            "Choice {} needs nondeterminism bits",
            choice
        );
        let mut bits = self.encoder.encode(symbol)?.clone();
        bits.extend(binary_code(choice as u64, self.num_nondet_vars));
        Ok(bits)
    }

    /// Splits a full-width bit string back into `(symbol, choice)`.
    ///
    /// # Errors
    ///
    /// Fails on a width mismatch or when the alphabet bits decode to no
    /// symbol.
    pub fn decode(&self, bits: &[Bit]) -> Result<(Symbol, usize)> {
        if bits.len() != self.num_vars() {
            return Err(Error::BitStringLength {
                expected: self.num_vars(),
                actual: bits.len(),
            });
        }
        let (symbol_code, choice_code) = bits.split_at(self.encoder.num_alphabet_vars());
        let symbol = self.encoder.decode(symbol_code)?;
        let choice = choice_code
            .iter()
            .fold(0usize, |acc, &bit| (acc << 1) | (bit as usize));
        Ok((symbol, choice))
    }
}

/// Maximum number of targets over all (source, symbol) pairs. 1 for a
/// deterministic relation, 0 for an empty one.
pub fn nondeterminism_level(transitions: &[(State, Symbol, State)]) -> usize {
    let mut counts: HashMap<(State, Symbol), usize> = HashMap::new();
    let mut level = 0;
    for &(source, symbol, _) in transitions {
        let count = counts.entry((source, symbol)).or_insert(0);
        *count += 1;
        level = level.max(*count);
    }
    level
}

/// Builds the shared transition diagram of a relation: one bit string per
/// (source, symbol, k-th target), with `k` in the trailing choice bits.
///
/// The result is raw; run the canonicalization pipeline before enumerating
/// or exporting it.
///
/// # Errors
///
/// Fails if a transition uses a symbol outside `alphabet`.
pub fn build_diagram(
    transitions: &[(State, Symbol, State)],
    alphabet: &[Symbol],
) -> Result<(MtBdd, TransitionEncoding)> {
    let level = nondeterminism_level(transitions);
    let encoding = TransitionEncoding::new(alphabet, level);
    let mut mtbdd = MtBdd::new(encoding.num_vars());

    let mut choices: HashMap<(State, Symbol), usize> = HashMap::new();
    for &(source, symbol, target) in transitions {
        let choice = choices.entry((source, symbol)).or_insert(0);
        let bits = encoding.encode(symbol, *choice)?;
        *choice += 1;
        mtbdd.insert_bit_string(source, &bits, target)?;
    }

    debug!(
        "build_diagram: {} transitions, {} states, {} variables",
        transitions.len(),
        mtbdd.num_roots(),
        encoding.num_vars()
    );
    Ok((mtbdd, encoding))
}

/// Reads the transition relation back out of a diagram.
///
/// Every path of every root decodes to one `(source, symbol, target)`
/// transition; distinct choice bits leading to the same target collapse.
/// The reserved sink is dropped on both ends (the root named
/// [`SINK_VALUE`] and paths ending in it); a sink completed under a real
/// state id is kept, matching the complete-automaton reading where the
/// reject state has explicit transitions.
///
/// # Errors
///
/// Fails if a non-sink path carries alphabet bits outside the encoder's
/// dictionary.
pub fn decode_diagram(
    mtbdd: &MtBdd,
    encoding: &TransitionEncoding,
) -> Result<Vec<(State, Symbol, State)>> {
    let mut transitions = Vec::new();
    for (name, root) in mtbdd.roots() {
        if name == SINK_VALUE {
            continue;
        }
        for (bits, value) in mtbdd.paths(root) {
            if value == SINK_VALUE {
                continue;
            }
            let (symbol, _choice) = encoding.decode(&bits)?;
            transitions.push((name, symbol, value));
        }
    }
    transitions.sort_unstable();
    transitions.dedup();
    Ok(transitions)
}
