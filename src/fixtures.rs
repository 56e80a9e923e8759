//! Protocol fixtures for DXswap test suites.
//!
//! # Data Flow
//! ```text
//! deploy WETH9
//!     → deploy DXswapDeployer(owner, weth, tokensA, tokensB, swapFees)
//!     → fund deployer (1 wei)
//!     → deployer.deploy()
//!     → first receipt log carries the factory address
//!     → factory.feeToSetter() / factory.feeTo()
//!     → handles bound to the signing provider
//! ```
//!
//! Every step runs in sequence. Nothing is retried or rolled back; the
//! first failure is returned to the caller.

use std::future::IntoFuture;
use std::ops::Deref;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use alloy::rpc::types::{Log, TransactionRequest};
use alloy::sol_types::SolValue;
use tokio::time::timeout;

use crate::artifacts::{ArtifactStore, ContractKind};
use crate::blockchain::{BlockchainClient, BlockchainError, TxSender, Wallet};
use crate::config::{DeploymentConfig, FixtureConfig};
use crate::contracts::{
    DXswapDeployer, DXswapFactory, DXswapFeeReceiver, DXswapFeeSetter, DXswapPair, DeployerHandle,
    Erc20Handle, FactoryHandle, FeeReceiverHandle, FeeSetterHandle, PairHandle, ERC20,
};
use crate::deploy::{ensure_deployed, ContractDeployer};
use crate::error::{FixtureError, FixtureResult};
use crate::units::expand_to_18_decimals;

/// A pair the deployer creates alongside the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSpec {
    pub token_a: Address,
    pub token_b: Address,
    pub swap_fee: u32,
}

/// Factory, fee-setter and fee-receiver handles.
#[derive(Debug, Clone)]
pub struct FactoryFixture {
    pub factory: FactoryHandle,
    pub fee_setter: FeeSetterHandle,
    pub fee_receiver: FeeReceiverHandle,
}

/// A [`FactoryFixture`] plus two tokens and the pair created for them.
///
/// `token0` and `token1` follow the pair's own ordering.
#[derive(Debug, Clone)]
pub struct PairFixture {
    pub protocol: FactoryFixture,
    pub token0: Erc20Handle,
    pub token1: Erc20Handle,
    pub pair: PairHandle,
}

impl Deref for PairFixture {
    type Target = FactoryFixture;

    fn deref(&self) -> &FactoryFixture {
        &self.protocol
    }
}

/// Connection, artifacts and deployment parameters shared by the fixtures.
#[derive(Debug, Clone)]
pub struct FixtureEnv {
    client: BlockchainClient,
    deployer: ContractDeployer,
    options: DeploymentConfig,
}

impl FixtureEnv {
    pub fn new(client: BlockchainClient, artifacts: ArtifactStore, options: DeploymentConfig) -> Self {
        let deployer = ContractDeployer::new(TxSender::new(client.clone()), artifacts);
        Self {
            client,
            deployer,
            options,
        }
    }

    /// Connect to the configured node with `wallet` as the deploying account.
    pub async fn connect(config: &FixtureConfig, wallet: Wallet) -> FixtureResult<Self> {
        let client = BlockchainClient::new(config.chain.clone(), wallet).await?;
        Ok(Self::new(
            client,
            ArtifactStore::new(&config.artifacts.dir),
            config.deployment.clone(),
        ))
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    pub fn options(&self) -> &DeploymentConfig {
        &self.options
    }

    /// Address that deploys and owns everything.
    pub fn owner(&self) -> Address {
        self.client.address()
    }

    fn provider(&self) -> DynProvider {
        self.client.provider().clone()
    }

    /// Await a contract read under the RPC timeout.
    async fn read<T, F>(&self, call: F) -> FixtureResult<T>
    where
        F: IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        let secs = self.client.config().rpc_timeout_secs;
        match timeout(std::time::Duration::from_secs(secs), call.into_future()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(BlockchainError::Timeout(secs).into()),
        }
    }
}

/// Deploy an empty protocol: factory, fee-setter and fee-receiver, no pairs.
pub async fn factory_fixture(env: &FixtureEnv) -> FixtureResult<FactoryFixture> {
    deploy_protocol(env, &[]).await
}

/// Deploy two test tokens and a protocol with one pair for them.
pub async fn pair_fixture(env: &FixtureEnv) -> FixtureResult<PairFixture> {
    let options = env.options();
    let supply = expand_to_18_decimals(options.token_supply);
    let gas_limit = Some(options.gas_limit);

    let token_a = env
        .deployer
        .deploy(ContractKind::Erc20, &[DynSolValue::Uint(supply, 256)], gas_limit)
        .await?;
    let token_b = env
        .deployer
        .deploy(ContractKind::Erc20, &[DynSolValue::Uint(supply, 256)], gas_limit)
        .await?;

    let spec = PairSpec {
        token_a,
        token_b,
        swap_fee: options.swap_fee,
    };
    let protocol = deploy_protocol(env, &[spec]).await?;

    let pair_address = env
        .read(protocol.factory.getPair(token_a, token_b).call())
        .await?;
    let pair_address = ensure_deployed(pair_address, "factory.getPair()")?;
    let pair: PairHandle = DXswapPair::new(pair_address, env.provider());

    let canonical_token0 = env.read(pair.token0().call()).await?;
    let (token0, token1) = order_tokens(token_a, token_b, canonical_token0)?;

    tracing::info!(
        pair = %pair_address,
        token0 = %token0,
        token1 = %token1,
        swap_fee = options.swap_fee,
        "Pair fixture ready"
    );

    Ok(PairFixture {
        protocol,
        token0: ERC20::new(token0, env.provider()),
        token1: ERC20::new(token1, env.provider()),
        pair,
    })
}

/// Deploy WETH, the DXswap deployer and run it for `pairs`.
pub async fn deploy_protocol(env: &FixtureEnv, pairs: &[PairSpec]) -> FixtureResult<FactoryFixture> {
    let options = env.options();

    let weth = env.deployer.deploy(ContractKind::Weth9, &[], None).await?;
    let deployer_address = env
        .deployer
        .deploy(
            ContractKind::Deployer,
            &deployer_constructor_args(env.owner(), weth, pairs),
            Some(options.gas_limit),
        )
        .await?;

    // deploy() only runs once the deployer has received a payment.
    env.deployer
        .fund(
            deployer_address,
            U256::from(options.funding_value_wei),
            options.funding_gas_price_wei.map(u128::from),
        )
        .await?;

    let deployer: DeployerHandle = DXswapDeployer::new(deployer_address, env.provider());
    let receipt = env.deployer.send(deploy_request(&deployer)).await?;

    let factory_address = factory_address_from_logs(receipt.inner.logs())?;
    let factory_address = ensure_deployed(factory_address, "deployment log factory")?;
    let factory: FactoryHandle = DXswapFactory::new(factory_address, env.provider());

    let fee_setter_address = env.read(factory.feeToSetter().call()).await?;
    let fee_setter_address = ensure_deployed(fee_setter_address, "factory.feeToSetter()")?;
    let fee_receiver_address = env.read(factory.feeTo().call()).await?;
    let fee_receiver_address = ensure_deployed(fee_receiver_address, "factory.feeTo()")?;

    tracing::info!(
        factory = %factory_address,
        fee_setter = %fee_setter_address,
        fee_receiver = %fee_receiver_address,
        pairs = pairs.len(),
        "Protocol deployed"
    );

    Ok(FactoryFixture {
        factory,
        fee_setter: DXswapFeeSetter::new(fee_setter_address, env.provider()),
        fee_receiver: DXswapFeeReceiver::new(fee_receiver_address, env.provider()),
    })
}

/// The deployer's `deploy()` call as a transaction request.
fn deploy_request(deployer: &DeployerHandle) -> TransactionRequest {
    deployer.deploy_call().into_transaction_request()
}

/// Constructor arguments of `DXswapDeployer`.
pub fn deployer_constructor_args(owner: Address, weth: Address, pairs: &[PairSpec]) -> Vec<DynSolValue> {
    let tokens_a = pairs.iter().map(|p| DynSolValue::Address(p.token_a)).collect();
    let tokens_b = pairs.iter().map(|p| DynSolValue::Address(p.token_b)).collect();
    let swap_fees = pairs
        .iter()
        .map(|p| DynSolValue::Uint(U256::from(p.swap_fee), 32))
        .collect();

    vec![
        DynSolValue::Address(owner),
        DynSolValue::Address(weth),
        DynSolValue::Array(tokens_a),
        DynSolValue::Array(tokens_b),
        DynSolValue::Array(swap_fees),
    ]
}

/// Read the factory address from the first log of the `deploy()` receipt.
///
/// The deployer emits `PairFactoryDeployed(address)` first; its data is the
/// ABI encoding of that one address.
pub fn factory_address_from_logs(logs: &[Log]) -> FixtureResult<Address> {
    let first = logs.first().ok_or(FixtureError::MissingDeploymentLog)?;

    Address::abi_decode(&first.data().data).map_err(|e| FixtureError::LogDecode(e.to_string()))
}

/// Order two tokens the way the pair does, given its `token0()`.
pub fn order_tokens(
    token_a: Address,
    token_b: Address,
    canonical_token0: Address,
) -> FixtureResult<(Address, Address)> {
    if canonical_token0 == token_a {
        Ok((token_a, token_b))
    } else if canonical_token0 == token_b {
        Ok((token_b, token_a))
    } else {
        Err(FixtureError::UnknownToken0 {
            token0: canonical_token0,
            token_a,
            token_b,
        })
    }
}
