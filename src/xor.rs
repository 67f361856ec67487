//! The XOR primitives.
//!
//! Encoded packets are built, and later peeled apart, with nothing but
//! bitwise XOR. These two functions are the only place where payload
//! bytes are transformed.

/// XORs two byte slices together.
///
/// The result has the length of the longer input. Overlapping bytes are
/// XORed, the tail past the shorter input is copied from the longer one.
/// Neither input is mutated.
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = longer.to_vec();
    for (o, s) in out.iter_mut().zip(shorter.iter()) {
        *o ^= *s;
    }
    out
}

/// Left fold of [xor] over a sequence of byte arrays.
///
/// Returns `None` for an empty sequence. The result has the maximum
/// length present in the sequence. XOR is commutative and associative,
/// so the order of the sequence does not matter.
pub fn combine<I>(parts: I) -> Option<Vec<u8>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut parts = parts.into_iter();
    let mut acc = parts.next()?.as_ref().to_vec();
    for part in parts {
        let part = part.as_ref();
        if part.len() > acc.len() {
            // 0 ^ b == b, so the grown tail takes the new part's bytes
            acc.resize(part.len(), 0);
        }
        for (a, b) in acc.iter_mut().zip(part.iter()) {
            *a ^= *b;
        }
    }
    Some(acc)
}
