//! Contract bindings used by the resolvers.

use alloy_sol_types::sol;

sol! {
    /// ENS registry (EIP-137).
    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    /// ENS public resolver profiles (EIP-137 `addr`, EIP-634 `text`).
    interface IEnsResolver {
        function addr(bytes32 node) external view returns (address);
        function text(bytes32 node, string key) external view returns (string);
    }

    /// The ERC-20 accessor used to verify token contracts.
    interface IERC20 {
        function decimals() external view returns (uint8);
    }
}
