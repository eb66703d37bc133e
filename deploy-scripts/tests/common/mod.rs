//! A recording in-memory chain used by the deployment tests
#![allow(dead_code)]

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use alloy::{
    primitives::{Address, Bytes, TxHash, TxKind, B256, U256},
    rpc::types::TransactionRequest,
};
use smartys_deploy::{
    artifacts::{ArtifactStore, ContractArtifact},
    client::{ChainClient, Confirmation},
    constants::ERC1820_REGISTRY_ADDRESS,
    errors::ProviderError,
    types::{ContractDescriptor, ContractName},
};
use tracing::{subscriber::DefaultGuard, Level};
use tracing_subscriber::fmt::MakeWriter;

/// The account the tests deploy from
pub const DEPLOYER: Address = Address::new([0xd0; 20]);

/// A stand-in for the presigned registry deployment transaction
pub const REGISTRY_TX: [u8; 4] = [0xf8, 0x01, 0x02, 0x03];

/// The bytecode of the test artifact for the given contract
pub fn bytecode(name: ContractName) -> Bytes {
    match name {
        ContractName::SmartysToken => Bytes::from_static(&[0x60, 0x01, 0x60, 0x01]),
        ContractName::TransportContract => Bytes::from_static(&[0x60, 0x02, 0x60, 0x02]),
        ContractName::OrderContract => Bytes::from_static(&[0x60, 0x03, 0x60, 0x03]),
    }
}

/// Test artifacts for all contracts
pub fn artifacts() -> ArtifactStore {
    ContractName::ALL
        .into_iter()
        .map(|name| ContractArtifact {
            name,
            bytecode: bytecode(name),
        })
        .collect()
}

/// The creation code expected for the given descriptor
pub fn creation_code(descriptor: &ContractDescriptor) -> Bytes {
    let mut code = bytecode(descriptor.name).to_vec();
    code.extend_from_slice(&descriptor.encoded_args());
    code.into()
}

/// A call made against the mock chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    /// A contract creation was submitted
    Create {
        /// The sender
        from: Address,
        /// The creation code, constructor arguments included
        code: Bytes,
    },
    /// A value transfer was submitted
    Transfer {
        /// The sender
        from: Address,
        /// The recipient
        to: Address,
        /// The amount of wei
        value: U256,
    },
    /// A signed transaction was submitted
    Raw(Bytes),
    /// Code was read from an address
    GetCode(Address),
}

/// The mutable state of the mock chain
#[derive(Default)]
struct MockState {
    /// Every call made, in order
    calls: Vec<Call>,
    /// The number of transactions included so far
    tx_count: u64,
    /// Confirmations of included transactions
    receipts: HashMap<TxHash, Confirmation>,
    /// Code deployed at each address
    code: HashMap<Address, Bytes>,
}

/// An in-memory chain recording every call made to it
#[derive(Default)]
pub struct MockClient {
    /// The chain state
    state: Mutex<MockState>,
    /// Creations whose code starts with one of these are rejected on submission
    rejected: Vec<Bytes>,
    /// Creations whose code starts with one of these revert
    reverted: Vec<Bytes>,
    /// Whether value transfers are rejected
    reject_transfers: bool,
}

impl MockClient {
    /// A fresh chain without the registry deployed
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain on which the ERC1820 registry is already deployed
    pub fn with_registry() -> Self {
        let client = Self::default();
        client
            .state
            .lock()
            .unwrap()
            .code
            .insert(ERC1820_REGISTRY_ADDRESS, Bytes::from_static(&[0x60, 0x80]));
        client
    }

    /// Rejects the creation of the given contract
    pub fn rejecting(mut self, name: ContractName) -> Self {
        self.rejected.push(bytecode(name));
        self
    }

    /// Reverts the creation of the given contract
    pub fn reverting(mut self, name: ContractName) -> Self {
        self.reverted.push(bytecode(name));
        self
    }

    /// Rejects all value transfers
    pub fn rejecting_transfers(mut self) -> Self {
        self.reject_transfers = true;
        self
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The creation codes submitted so far, rejected ones included
    pub fn creations(&self) -> Vec<Bytes> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create { code, .. } => Some(code),
                _ => None,
            })
            .collect()
    }

    /// The number of calls matching the predicate
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    /// Whether the registry is deployed
    pub fn registry_deployed(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .code
            .contains_key(&ERC1820_REGISTRY_ADDRESS)
    }

    /// Includes a transaction, returning its hash
    fn include(state: &mut MockState, success: bool, contract_address: Option<Address>) -> TxHash {
        state.tx_count += 1;
        let tx_hash = B256::left_padding_from(&state.tx_count.to_be_bytes());
        state.receipts.insert(
            tx_hash,
            Confirmation {
                tx_hash,
                success,
                contract_address: contract_address.filter(|_| success),
            },
        );
        tx_hash
    }
}

/// Whether the code starts with any of the given prefixes
fn matches_any(code: &Bytes, prefixes: &[Bytes]) -> bool {
    prefixes.iter().any(|prefix| code.starts_with(prefix))
}

impl ChainClient for MockClient {
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let from = tx.from.unwrap_or_default();

        match tx.to {
            Some(TxKind::Create) => {
                let code = tx.input.input().cloned().unwrap_or_default();
                state.calls.push(Call::Create {
                    from,
                    code: code.clone(),
                });
                if matches_any(&code, &self.rejected) {
                    return Err(ProviderError::Submission("creation rejected".to_string()));
                }

                let success = !matches_any(&code, &self.reverted);
                let address = from.create(state.tx_count);
                if success {
                    state.code.insert(address, code);
                }
                Ok(Self::include(&mut state, success, Some(address)))
            }
            Some(TxKind::Call(to)) => {
                let value = tx.value.unwrap_or_default();
                state.calls.push(Call::Transfer { from, to, value });
                if self.reject_transfers {
                    return Err(ProviderError::Submission("transfer rejected".to_string()));
                }
                Ok(Self::include(&mut state, true, None))
            }
            None => Err(ProviderError::Submission("missing recipient".to_string())),
        }
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<TxHash, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Raw(Bytes::copy_from_slice(raw_tx)));
        state
            .code
            .insert(ERC1820_REGISTRY_ADDRESS, Bytes::from_static(&[0x60, 0x80]));
        Ok(Self::include(&mut state, true, None))
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation, ProviderError> {
        self.state
            .lock()
            .unwrap()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| ProviderError::Confirmation(format!("unknown tx {tx_hash}")))
    }

    async fn get_code_at(&self, address: Address) -> Result<Bytes, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetCode(address));
        Ok(state.code.get(&address).cloned().unwrap_or_default())
    }
}

/// Log output captured from the current thread
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Captures logs at info level and above until the guard is dropped
    pub fn start() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();

        (logs, tracing::subscriber::set_default(subscriber))
    }

    /// The captured lines, in order
    pub fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).lines().map(str::to_string).collect()
    }

    /// The captured lines at the given level
    pub fn at_level(&self, level: Level) -> Vec<String> {
        let level = level.to_string();
        self.lines()
            .into_iter()
            .filter(|line| line.split_whitespace().next() == Some(level.as_str()))
            .collect()
    }

    /// Asserts the given messages were logged in order, each on its own line
    pub fn assert_in_order(&self, messages: &[String]) {
        let lines = self.lines();
        let mut next = 0;
        for message in messages {
            let found = lines[next..].iter().position(|line| line.ends_with(message.as_str()));
            match found {
                Some(offset) => next += offset + 1,
                None => panic!("{:?} not logged in order, got {:#?}", message, lines),
            }
        }
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
