pub mod field_codec;

pub use field_codec::{CodecError, FieldCodec, DECRYPT_SENTINEL};
