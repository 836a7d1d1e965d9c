// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract SwapRouter {
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) payable returns (uint256[] memory amounts);
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) returns (uint256[] memory amounts);
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) returns (uint256[] memory amounts);
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
    }

    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract WrappedNative {
        function deposit() external payable;
        function withdraw(uint256 amount) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract ERC20 {
        function balanceOf(address) external view returns (uint256);
        function decimals() external view returns (uint8);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy_sol_types::SolCall;

    #[test]
    fn router_entry_point_selectors() {
        assert_eq!(
            hex::encode(SwapRouter::swapExactETHForTokensCall::SELECTOR),
            "7ff36ab5"
        );
        assert_eq!(
            hex::encode(SwapRouter::swapExactTokensForETHCall::SELECTOR),
            "18cbafe5"
        );
        assert_eq!(
            hex::encode(SwapRouter::swapExactTokensForTokensCall::SELECTOR),
            "38ed1739"
        );
        assert_eq!(
            hex::encode(SwapRouter::getAmountsOutCall::SELECTOR),
            "d06ca61f"
        );
    }

    #[test]
    fn wrapped_native_and_erc20_selectors() {
        assert_eq!(hex::encode(WrappedNative::depositCall::SELECTOR), "d0e30db0");
        assert_eq!(hex::encode(WrappedNative::withdrawCall::SELECTOR), "2e1a7d4d");
        assert_eq!(hex::encode(ERC20::approveCall::SELECTOR), "095ea7b3");
        assert_eq!(hex::encode(ERC20::allowanceCall::SELECTOR), "dd62ed3e");
    }

    #[test]
    fn tokens_for_tokens_call_decodes_back() {
        let call = SwapRouter::swapExactTokensForTokensCall {
            amountIn: U256::from(10_000_000u64),
            amountOutMin: U256::from(19u64),
            path: vec![Address::from([1u8; 20]), Address::from([2u8; 20])],
            to: Address::from([3u8; 20]),
            deadline: U256::from(1_700_000_000u64),
        };
        let encoded = call.abi_encode();
        let decoded = SwapRouter::swapExactTokensForTokensCall::abi_decode(&encoded)
            .expect("decode swap call");
        assert_eq!(decoded.amountIn, call.amountIn);
        assert_eq!(decoded.amountOutMin, call.amountOutMin);
        assert_eq!(decoded.path, call.path);
    }
}
