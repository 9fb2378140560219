//! Source of RPC transaction ids and generated user passwords.

use rand::Rng;
use rand::distributions::Alphanumeric;

pub const TRANSACTION_ID_RANGE: std::ops::RangeInclusive<u32> = 1..=101;
pub const CREDENTIAL_LENGTH: std::ops::RangeInclusive<usize> = 12..=16;

pub trait IdGenerator: Send + Sync {
    /// Transaction id for the next RPC envelope.
    fn transaction_id(&self) -> u32;

    /// Password for a newly created repository-manager user.
    fn credential(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn transaction_id(&self) -> u32 {
        rand::thread_rng().gen_range(TRANSACTION_ID_RANGE)
    }

    fn credential(&self) -> String {
        let mut rng = rand::thread_rng();
        let length = rng.gen_range(CREDENTIAL_LENGTH);
        (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

/// Always hands out the same values.
#[derive(Debug, Clone)]
pub struct FixedIdGenerator {
    pub transaction_id: u32,
    pub credential: String,
}

impl IdGenerator for FixedIdGenerator {
    fn transaction_id(&self) -> u32 {
        self.transaction_id
    }

    fn credential(&self) -> String {
        self.credential.clone()
    }
}
