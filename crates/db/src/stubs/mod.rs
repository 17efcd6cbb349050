mod withdrawal;

pub use withdrawal::StubWithdrawalDb;
