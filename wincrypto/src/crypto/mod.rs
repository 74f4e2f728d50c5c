/*!
    Byte-order adapters over the trusted AES and RSA primitives.

    RSA:
    - PKCS#1 v1.5 signing and verification over a caller-supplied digest
    - PKCS#1 v1.5 encryption and decryption
    - signatures and ciphertexts are byte-reversed at the boundary,
      digests and plaintexts are not

    AES:
    - CBC with a random IV written as the first output block
    - PKCS#7 padding
    - no byte reversal

    The primitives themselves sit behind [`RsaBackend`] and [`AesBackend`];
    [`RustCrypto`] is the default implementation.
*/

mod aes;
mod backend;
mod padding;
mod rsa;

pub use self::aes::{AesCipher, AesConfig, AesPadding, IvPolicy};
pub use self::backend::{AesBackend, RsaBackend, RustCrypto};
pub use self::padding::{pkcs7_pad, pkcs7_unpad};
pub use self::rsa::RsaCipher;
