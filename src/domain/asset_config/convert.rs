use super::wire::WsActiveAssetData;
use super::AssetConfigUpdate;

impl From<WsActiveAssetData> for AssetConfigUpdate {
    fn from(d: WsActiveAssetData) -> Self {
        Self {
            instrument: d.coin,
            leverage: d.leverage.as_ref().map(|l| l.value),
            mode: d.leverage.map(|l| l.mode),
            max_leverage: d.max_leverage,
            max_trade_sizes: d.max_trade_szs,
            available_to_trade: d.available_to_trade,
        }
    }
}
