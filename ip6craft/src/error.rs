use quick_error::quick_error;

quick_error! {
    /// The error type of this crate.
    ///
    /// Field accessors on the header views never fail. Errors only come from
    /// textual input, the strict setters and frame length derivation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        /// The text is not a valid address.
        Parse(text: String) {
            display("invalid address: {:?}", text)
        }
        /// A strict setter received a value wider than its field.
        Range(field: &'static str, value: u64, max: u64) {
            display("{} value {} is out of range (max {})", field, value, max)
        }
        /// The frame cannot hold the headers it must carry.
        FrameTooShort(total: usize, min: usize) {
            display("frame length {} is shorter than the {} header bytes", total, min)
        }
        /// The derived payload length does not fit the 16-bit field.
        PayloadTooLong(len: usize) {
            display("payload length {} does not fit in 16 bits", len)
        }
    }
}

/// A `Result` alias with the crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
