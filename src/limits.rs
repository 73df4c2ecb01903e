/// Max length for provider and client identifiers.
pub const MAX_ID_LEN: usize = 128;
