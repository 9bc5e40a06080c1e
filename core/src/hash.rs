//! Hash related utils.

use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;

/// Uppercase hex encoded HMAC with SHA256 hash.
pub fn upper_hex_hmac_sha256(key: &[u8], content: &[u8]) -> String {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = Hmac::<Sha256>::new_from_slice(key).unwrap();
    h.update(content);

    hex::encode_upper(h.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_hex_hmac_sha256() {
        // RFC 4231 test case 2
        let sig = upper_hex_hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            sig,
            "5BDCC146BF60754E6A042426089575C75A003F089D2739839DEC58B964EC3843"
        );
    }
}
