pub mod crowdfund {
    tonic::include_proto!("crowdfund");
}

/// Encoded descriptors of every crowdfund service, for gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("crowdfund_descriptor");
