//! # JSON <-> Protobuf Codec
//!
//! A `tonic::codec::Codec` that lets `tonic` move `serde_json::Value`s over the wire.
//!
//! Requests are validated against the method's input descriptor while being turned into a
//! `DynamicMessage`; responses are decoded with the output descriptor and rendered back to
//! JSON with every field present, default values included, so that callers always see the
//! full shape of the message.
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, MethodDescriptor, SerializeOptions};
use tonic::{
    Status,
    codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder},
};

/// Transcodes JSON requests and responses for one gRPC method.
#[derive(Debug, Clone)]
pub struct JsonCodec {
    input: MessageDescriptor,
    output: MessageDescriptor,
}

impl JsonCodec {
    /// Builds a codec from the request and response schemas of `method`.
    pub fn for_method(method: &MethodDescriptor) -> Self {
        Self {
            input: method.input(),
            output: method.output(),
        }
    }
}

impl Codec for JsonCodec {
    type Encode = serde_json::Value;
    type Decode = serde_json::Value;

    type Encoder = JsonEncoder;
    type Decoder = JsonDecoder;

    fn encoder(&mut self) -> Self::Encoder {
        JsonEncoder {
            schema: self.input.clone(),
        }
    }

    fn decoder(&mut self) -> Self::Decoder {
        JsonDecoder {
            schema: self.output.clone(),
            options: SerializeOptions::new().skip_default_fields(false),
        }
    }
}

/// Encodes a JSON request as protobuf bytes.
#[derive(Debug)]
pub struct JsonEncoder {
    schema: MessageDescriptor,
}

impl Encoder for JsonEncoder {
    type Item = serde_json::Value;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        // serde_json::Value is a Deserializer, so the schema check happens while parsing.
        let message = DynamicMessage::deserialize(self.schema.clone(), item).map_err(|e| {
            Status::invalid_argument(format!(
                "Request does not match the '{}' schema: {}",
                self.schema.full_name(),
                e
            ))
        })?;

        message.encode_raw(dst);
        Ok(())
    }
}

/// Decodes protobuf response bytes into JSON.
pub struct JsonDecoder {
    schema: MessageDescriptor,
    options: SerializeOptions,
}

impl Decoder for JsonDecoder {
    type Item = serde_json::Value;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        let mut message = DynamicMessage::new(self.schema.clone());
        message.merge(src).map_err(|e| {
            Status::internal(format!(
                "Failed to decode '{}' from the response: {}",
                self.schema.full_name(),
                e
            ))
        })?;

        let value = message
            .serialize_with_options(serde_json::value::Serializer, &self.options)
            .map_err(|e| Status::internal(format!("Failed to render response as JSON: {}", e)))?;

        Ok(Some(value))
    }
}
