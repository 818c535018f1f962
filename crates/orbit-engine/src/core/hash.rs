//! Stable identity hash (32-bit FNV-1a).
//! Same output across runs, processes and hosts: no platform hashing involved.

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Fold an identifier into a 32-bit FNV-1a value.
///
/// Iterates UTF-16 code units so the result matches a browser host that
/// hashes with `charCodeAt`.
pub fn fnv1a32(id: &str) -> u32 {
    id.encode_utf16().fold(FNV_OFFSET, |hash, unit| {
        (hash ^ unit as u32).wrapping_mul(FNV_PRIME)
    })
}

/// Map an identifier to a value in [0, 1).
pub fn stable_hash(id: &str) -> f64 {
    let h = fnv1a32(id);
    if h == u32::MAX {
        // h / (2^32 - 1) would be exactly 1.0
        return 0.0;
    }
    h as f64 / u32::MAX as f64
}

/// Hash an orbiting entity, falling back to its sibling index when the
/// identifier is empty.
pub fn hash_for(id: &str, sibling_index: usize) -> f64 {
    if id.is_empty() {
        stable_hash(&sibling_index.to_string())
    } else {
        stable_hash(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_fnv1a_reference_vectors() {
        assert_eq!(fnv1a32(""), 0x811c_9dc5);
        assert_eq!(fnv1a32("a"), 0xe40c_292c);
        assert_eq!(fnv1a32("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn hash_is_deterministic() {
        for id in ["", "sirius", "planet-42", "ünïcödé", "🚀 launch"] {
            assert_eq!(stable_hash(id), stable_hash(id));
            assert_eq!(stable_hash(id).to_bits(), stable_hash(&id.to_string()).to_bits());
        }
    }

    #[test]
    fn hash_stays_in_unit_interval() {
        for i in 0..2000 {
            let h = stable_hash(&format!("node-{i}"));
            assert!((0.0..1.0).contains(&h), "hash {h} out of range");
        }
    }

    #[test]
    fn non_bmp_chars_hash_as_surrogate_pairs() {
        // U+1F680 is two UTF-16 units: 0xD83D 0xDE80
        let expected = [0xD83Du32, 0xDE80]
            .iter()
            .fold(FNV_OFFSET, |h, u| (h ^ u).wrapping_mul(FNV_PRIME));
        assert_eq!(fnv1a32("🚀"), expected);
    }

    #[test]
    fn empty_id_falls_back_to_index() {
        assert_eq!(hash_for("", 3), stable_hash("3"));
        assert_eq!(hash_for("moon", 3), stable_hash("moon"));
    }
}
