pub mod ledger {
    use crate::Record;

    include!("./generated/ledger.rs");

    impl RecordMessage {
        pub fn new(offset: i64, record: Record) -> Self {
            Self {
                seconds: record.seconds(),
                nanos: record.subsec_nanos(),
                value: record.value,
                offset,
            }
        }

        /// The [Record] carried, or None if the timestamp is unrepresentable.
        pub fn into_record(self) -> Option<Record> {
            Record::from_parts(self.value, self.seconds, self.nanos)
        }
    }
}
