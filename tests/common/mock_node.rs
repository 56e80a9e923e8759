//! In-process JSON-RPC node that mines every transaction as it arrives.
//!
//! Answers the handful of methods the fixtures use, records what was sent
//! and replies to the DXswap reads with fixed addresses.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Bloom, Bytes, TxKind, B256, U256};
use alloy::sol_types::{SolCall, SolEvent, SolValue};
use dxswap_fixtures::contracts::{DXswapDeployer, DXswapFactory, DXswapPair};
use dxswap_fixtures::{ContractKind, Wallet};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const FACTORY: Address = Address::repeat_byte(0x0f);
pub const FEE_SETTER: Address = Address::repeat_byte(0x0e);
pub const FEE_RECEIVER: Address = Address::repeat_byte(0x0d);
pub const PAIR: Address = Address::repeat_byte(0x0c);

/// Creation bytecode of the artifacts written by [`write_artifacts`].
pub const TOKEN_CODE: [u8; 4] = [0x60, 0x01, 0x60, 0x01];
pub const WETH_CODE: [u8; 4] = [0x60, 0x02, 0x60, 0x02];
pub const DEPLOYER_CODE: [u8; 4] = [0x60, 0x03, 0x60, 0x03];

const GAS_ESTIMATE: u64 = 2_000_000;
const GAS_USED: u64 = 21_000;
const BASE_FEE: u64 = 1_000_000_000;

/// A transaction or read the node served, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    Create {
        code: Bytes,
        address: Address,
    },
    Transfer {
        to: Address,
        value: U256,
        gas_price: Option<u128>,
    },
    Call {
        to: Address,
        input: Bytes,
    },
    Read {
        to: Address,
        selector: [u8; 4],
    },
}

struct NodeState {
    chain_id: u64,
    sender: Address,
    block: u64,
    events: Vec<NodeEvent>,
    receipts: HashMap<B256, Value>,
}

/// Handle to a running mock node.
pub struct MockNode {
    url: String,
    state: Arc<Mutex<NodeState>>,
}

impl MockNode {
    /// Listen on an ephemeral port and serve until the test ends.
    pub async fn start(chain_id: u64) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(Mutex::new(NodeState {
            chain_id,
            sender: Wallet::dev(chain_id).unwrap().address(),
            block: 0,
            events: Vec::new(),
            receipts: HashMap::new(),
        }));

        let shared = state.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => {
                        tokio::spawn(serve(socket, shared.clone()));
                    }
                    Err(_) => break,
                }
            }
        });

        Self { url, state }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn events(&self) -> Vec<NodeEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// Addresses of the test tokens created so far.
    pub fn tokens(&self) -> Vec<Address> {
        self.state.lock().unwrap().tokens()
    }
}

/// Write minimal ERC20, WETH9 and deployer artifacts whose bytecode the
/// node recognizes.
pub fn write_artifacts(dir: &PathBuf) {
    super::write_artifact(
        dir,
        ContractKind::Erc20,
        &artifact_json(
            r#"[{ "type": "constructor", "stateMutability": "nonpayable",
                  "inputs": [{ "name": "totalSupply", "type": "uint256", "internalType": "uint256" }] }]"#,
            &TOKEN_CODE,
        ),
    );
    super::write_artifact(dir, ContractKind::Weth9, &artifact_json("[]", &WETH_CODE));
    super::write_artifact(
        dir,
        ContractKind::Deployer,
        &artifact_json(
            r#"[{ "type": "constructor", "stateMutability": "payable",
                  "inputs": [
                      { "name": "dxdaoAvatar", "type": "address", "internalType": "address" },
                      { "name": "WETH", "type": "address", "internalType": "address" },
                      { "name": "tokensA", "type": "address[]", "internalType": "address[]" },
                      { "name": "tokensB", "type": "address[]", "internalType": "address[]" },
                      { "name": "swapFees", "type": "uint32[]", "internalType": "uint32[]" }
                  ] }]"#,
            &DEPLOYER_CODE,
        ),
    );
}

fn artifact_json(abi: &str, code: &[u8]) -> String {
    format!(r#"{{ "abi": {}, "bytecode": "{}" }}"#, abi, alloy::hex::encode(code))
}

async fn serve(mut socket: TcpStream, state: Arc<Mutex<NodeState>>) {
    let Some(body) = read_request(&mut socket).await else {
        return;
    };
    let response = state.lock().unwrap().handle(&body).to_string();

    let response_str = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.len(),
        response
    );
    let _ = socket.write_all(response_str.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Read one HTTP request and return its body.
async fn read_request(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length: usize = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[header_end..header_end + content_length].to_vec())
}

fn quantity(value: u64) -> Value {
    json!(format!("{:#x}", value))
}

fn block_hash(block: u64) -> B256 {
    B256::left_padding_from(&block.to_be_bytes())
}

impl NodeState {
    fn handle(&mut self, body: &[u8]) -> Value {
        let request: Value = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                return json!({
                    "jsonrpc": "2.0",
                    "id": null,
                    "error": { "code": -32700, "message": e.to_string() }
                })
            }
        };
        let id = request["id"].clone();
        let params = &request["params"];

        let result = match request["method"].as_str().unwrap_or_default() {
            "eth_chainId" => Ok(quantity(self.chain_id)),
            "eth_blockNumber" => Ok(quantity(self.block)),
            "eth_getTransactionCount" => Ok(quantity(self.nonce())),
            "eth_estimateGas" => Ok(quantity(GAS_ESTIMATE)),
            "eth_gasPrice" | "eth_maxPriorityFeePerGas" => Ok(quantity(BASE_FEE)),
            "eth_feeHistory" => Ok(self.fee_history()),
            "eth_sendRawTransaction" => self.send_raw_transaction(params),
            "eth_getTransactionReceipt" => Ok(self.receipt(params)),
            "eth_call" => self.call(params),
            other => Err(format!("method {} not supported", other)),
        };

        match result {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": message }
            }),
        }
    }

    fn nonce(&self) -> u64 {
        self.events
            .iter()
            .filter(|event| !matches!(event, NodeEvent::Read { .. }))
            .count() as u64
    }

    fn created(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, NodeEvent::Create { .. }))
            .count()
    }

    fn tokens(&self) -> Vec<Address> {
        self.events
            .iter()
            .filter_map(|event| match event {
                NodeEvent::Create { code, address } if code.starts_with(&TOKEN_CODE) => Some(*address),
                _ => None,
            })
            .collect()
    }

    fn fee_history(&self) -> Value {
        let blocks = 10;
        json!({
            "oldestBlock": quantity(self.block.saturating_sub(blocks)),
            "baseFeePerGas": vec![quantity(BASE_FEE); blocks as usize + 1],
            "gasUsedRatio": vec![0.5; blocks as usize],
            "reward": vec![vec![quantity(1)]; blocks as usize],
        })
    }

    fn send_raw_transaction(&mut self, params: &Value) -> Result<Value, String> {
        let raw: Bytes = params[0]
            .as_str()
            .ok_or("missing raw transaction")?
            .parse()
            .map_err(|e| format!("invalid raw transaction: {}", e))?;
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref())
            .map_err(|e| format!("cannot decode transaction: {}", e))?;
        let tx_hash = *envelope.tx_hash();

        self.block += 1;
        let input = envelope.input().clone();

        let (to, contract_address, logs) = match envelope.kind() {
            TxKind::Create => {
                // Descending addresses, so the second token sorts first.
                let address = Address::repeat_byte(0xf0 - 0x10 * self.created() as u8);
                self.events.push(NodeEvent::Create {
                    code: input,
                    address,
                });
                (None, Some(address), Vec::new())
            }
            TxKind::Call(to) if input.is_empty() => {
                self.events.push(NodeEvent::Transfer {
                    to,
                    value: envelope.value(),
                    gas_price: envelope.gas_price(),
                });
                (Some(to), None, Vec::new())
            }
            TxKind::Call(to) => {
                let logs = if input.starts_with(&DXswapDeployer::deployCall::SELECTOR) {
                    self.deployment_logs(to, tx_hash)
                } else {
                    Vec::new()
                };
                self.events.push(NodeEvent::Call { to, input });
                (Some(to), None, logs)
            }
        };

        let receipt = json!({
            "type": quantity(u8::from(envelope.tx_type()) as u64),
            "status": "0x1",
            "cumulativeGasUsed": quantity(GAS_USED),
            "logs": logs,
            "logsBloom": Bloom::default(),
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "blockHash": block_hash(self.block),
            "blockNumber": quantity(self.block),
            "gasUsed": quantity(GAS_USED),
            "effectiveGasPrice": quantity(BASE_FEE),
            "from": self.sender,
            "to": to,
            "contractAddress": contract_address,
        });
        self.receipts.insert(tx_hash, receipt);

        Ok(json!(tx_hash))
    }

    /// Events of a deployer run: factory first, then the fee contracts.
    fn deployment_logs(&self, deployer: Address, tx_hash: B256) -> Vec<Value> {
        [
            (DXswapDeployer::PairFactoryDeployed::SIGNATURE_HASH, FACTORY),
            (DXswapDeployer::PairDeployed::SIGNATURE_HASH, PAIR),
            (DXswapDeployer::FeeReceiverDeployed::SIGNATURE_HASH, FEE_RECEIVER),
            (DXswapDeployer::FeeSetterDeployed::SIGNATURE_HASH, FEE_SETTER),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (topic, address))| {
            json!({
                "address": deployer,
                "topics": [topic],
                "data": Bytes::from(address.abi_encode()),
                "blockHash": block_hash(self.block),
                "blockNumber": quantity(self.block),
                "transactionHash": tx_hash,
                "transactionIndex": "0x0",
                "logIndex": quantity(index as u64),
                "removed": false,
            })
        })
        .collect()
    }

    fn receipt(&self, params: &Value) -> Value {
        params[0]
            .as_str()
            .and_then(|hash| hash.parse::<B256>().ok())
            .and_then(|hash| self.receipts.get(&hash).cloned())
            .unwrap_or(Value::Null)
    }

    fn call(&mut self, params: &Value) -> Result<Value, String> {
        let request = &params[0];
        let to: Address = request["to"]
            .as_str()
            .ok_or("missing call target")?
            .parse()
            .map_err(|e| format!("invalid call target: {}", e))?;
        let input: Bytes = request["input"]
            .as_str()
            .or_else(|| request["data"].as_str())
            .ok_or("missing call data")?
            .parse()
            .map_err(|e| format!("invalid call data: {}", e))?;
        if input.len() < 4 {
            return Err("call data shorter than a selector".to_string());
        }

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&input[..4]);
        self.events.push(NodeEvent::Read { to, selector });

        let answer = if selector == DXswapFactory::feeToSetterCall::SELECTOR {
            FEE_SETTER
        } else if selector == DXswapFactory::feeToCall::SELECTOR {
            FEE_RECEIVER
        } else if selector == DXswapFactory::getPairCall::SELECTOR {
            PAIR
        } else if selector == DXswapPair::token0Call::SELECTOR {
            self.tokens().into_iter().min().ok_or("no tokens deployed")?
        } else {
            return Err(format!("unexpected call {}", input));
        };

        Ok(json!(Bytes::from(answer.abi_encode())))
    }
}
