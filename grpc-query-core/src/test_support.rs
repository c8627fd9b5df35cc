//! Descriptors built in code, so unit tests need neither `protoc` nor a server.
use prost_reflect::{DescriptorPool, MethodDescriptor};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
    MethodDescriptorProto, ServiceDescriptorProto,
    field_descriptor_proto::{Label, Type},
};

/// Methods of `echo.EchoService`: `Unary`, `ServerStream` and `ClientStream`.
pub fn file_descriptor_set() -> FileDescriptorSet {
    let message = |name: &str| DescriptorProto {
        name: Some(name.to_string()),
        field: vec![FieldDescriptorProto {
            name: Some("message".to_string()),
            json_name: Some("message".to_string()),
            number: Some(1),
            label: Some(Label::Optional as i32),
            r#type: Some(Type::String as i32),
            ..Default::default()
        }],
        ..Default::default()
    };

    let method = |name: &str, client_streaming: bool, server_streaming: bool| {
        MethodDescriptorProto {
            name: Some(name.to_string()),
            input_type: Some(".echo.EchoRequest".to_string()),
            output_type: Some(".echo.EchoResponse".to_string()),
            client_streaming: Some(client_streaming),
            server_streaming: Some(server_streaming),
            ..Default::default()
        }
    };

    let file = FileDescriptorProto {
        name: Some("echo.proto".to_string()),
        package: Some("echo".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![message("EchoRequest"), message("EchoResponse")],
        service: vec![ServiceDescriptorProto {
            name: Some("EchoService".to_string()),
            method: vec![
                method("Unary", false, false),
                method("ServerStream", false, true),
                method("ClientStream", true, false),
            ],
            ..Default::default()
        }],
        ..Default::default()
    };

    FileDescriptorSet { file: vec![file] }
}

pub fn pool() -> DescriptorPool {
    DescriptorPool::from_file_descriptor_set(file_descriptor_set()).expect("valid echo descriptor")
}

pub fn method(name: &str) -> MethodDescriptor {
    pool()
        .get_service_by_name("echo.EchoService")
        .and_then(|service| service.methods().find(|m| m.name() == name))
        .expect("method exists in the echo descriptor")
}
