//! Typed bindings for the DXswap contracts.
//!
//! Only the surface a test suite talks to is declared here. Bytecode comes
//! from the build artifacts at deployment time, not from these bindings.

use alloy::providers::DynProvider;
use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract ERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
        function transfer(address to, uint256 value) external returns (bool);
        function transferFrom(address from, address to, uint256 value) external returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract DXswapFactory {
        event PairCreated(address indexed token0, address indexed token1, address pair, uint256 index);

        function feeTo() external view returns (address);
        function feeToSetter() external view returns (address);
        function protocolFeeDenominator() external view returns (uint8);
        function getPair(address tokenA, address tokenB) external view returns (address pair);
        function allPairs(uint256 index) external view returns (address pair);
        function allPairsLength() external view returns (uint256);
        function INIT_CODE_PAIR_HASH() external view returns (bytes32);

        function createPair(address tokenA, address tokenB) external returns (address pair);
        function setFeeTo(address feeTo) external;
        function setFeeToSetter(address feeToSetter) external;
        function setProtocolFee(uint8 protocolFeeDenominator) external;
        function setSwapFee(address pair, uint32 swapFee) external;
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract DXswapPair {
        event Mint(address indexed sender, uint256 amount0, uint256 amount1);
        event Burn(address indexed sender, uint256 amount0, uint256 amount1, address indexed to);
        event Swap(
            address indexed sender,
            uint256 amount0In,
            uint256 amount1In,
            uint256 amount0Out,
            uint256 amount1Out,
            address indexed to
        );
        event Sync(uint112 reserve0, uint112 reserve1);

        function MINIMUM_LIQUIDITY() external pure returns (uint256);
        function factory() external view returns (address);
        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function price0CumulativeLast() external view returns (uint256);
        function price1CumulativeLast() external view returns (uint256);
        function kLast() external view returns (uint256);
        function swapFee() external view returns (uint32);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);

        function approve(address spender, uint256 value) external returns (bool);
        function transfer(address to, uint256 value) external returns (bool);
        function mint(address to) external returns (uint256 liquidity);
        function burn(address to) external returns (uint256 amount0, uint256 amount1);
        function swap(uint256 amount0Out, uint256 amount1Out, address to, bytes calldata data) external;
        function skim(address to) external;
        function sync() external;
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract DXswapDeployer {
        event FeeReceiverDeployed(address feeReceiver);
        event FeeSetterDeployed(address feeSetter);
        event PairFactoryDeployed(address factory);
        event PairDeployed(address pair);

        constructor(
            address dxdaoAvatar,
            address WETH,
            address[] memory tokensA,
            address[] memory tokensB,
            uint32[] memory swapFees
        ) payable {}

        function state() external view returns (uint8);
        function deploy() external;
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract DXswapFeeSetter {
        function owner() external view returns (address);
        function factory() external view returns (address);
        function transferOwnership(address newOwner) external;
        function setFeeTo(address feeTo) external;
        function setFeeToSetter(address feeToSetter) external;
        function setSwapFee(address pair, uint32 swapFee) external;
        function setProtocolFee(uint8 protocolFeeDenominator) external;
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract DXswapFeeReceiver {
        function owner() external view returns (address);
        function factory() external view returns (address);
        function WETH() external view returns (address);
        function ethReceiver() external view returns (address);
        function fallbackReceiver() external view returns (address);
        function transferOwnership(address newOwner) external;
        function changeReceivers(address ethReceiver, address fallbackReceiver) external;
        function takeProtocolFee(address[] calldata pairs) external;
    }
}

/// ERC-20 handle signing with the fixture wallet.
pub type Erc20Handle = ERC20::ERC20Instance<DynProvider>;
pub type FactoryHandle = DXswapFactory::DXswapFactoryInstance<DynProvider>;
pub type PairHandle = DXswapPair::DXswapPairInstance<DynProvider>;
pub type DeployerHandle = DXswapDeployer::DXswapDeployerInstance<DynProvider>;
pub type FeeSetterHandle = DXswapFeeSetter::DXswapFeeSetterInstance<DynProvider>;
pub type FeeReceiverHandle = DXswapFeeReceiver::DXswapFeeReceiverInstance<DynProvider>;
