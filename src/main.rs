// ==========================================
// 设备成本报价系统 - 命令行入口
// ==========================================
// 用法:
//   equipment-quote import <file.csv|file.json>
//   equipment-quote list
//   equipment-quote band <equipment_id> [months] [insurance]
//   equipment-quote quote <equipment_id> [uses_per_day] [price_per_use] [financed|cash] [months]
//
// 数据库路径: EQUIPMENT_QUOTE_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{anyhow, bail, Context};
use equipment_quote::app::{get_default_db_path, AppState};
use equipment_quote::domain::{PaymentMode, QuoteInput};
use equipment_quote::logging;

const USAGE: &str = "用法:
  equipment-quote import <file.csv|file.json>
  equipment-quote list
  equipment-quote band <equipment_id> [months] [insurance]
  equipment-quote quote <equipment_id> [uses_per_day] [price_per_use] [financed|cash] [months]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    tracing::info!(
        "{} v{} 启动",
        equipment_quote::APP_NAME,
        equipment_quote::VERSION
    );

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).await.map_err(|e| anyhow!(e))?;
    let api = state.quote_api.clone();

    match command.as_str() {
        "import" => {
            let path = args.get(1).context("缺少文件路径")?;
            let summary = api.import_catalog(path)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "list" => {
            let items = api.list_equipment()?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        "band" => {
            let equipment_id = args.get(1).context("缺少设备编号")?;
            let months = parse_opt::<u32>(args.get(2), "months")?;
            let insurance = matches!(
                args.get(3).map(|s| s.trim().to_lowercase()).as_deref(),
                Some("insurance" | "true" | "1")
            );
            let view = api.financing_band(equipment_id, months, insurance).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        "quote" => {
            let equipment_id = args.get(1).context("缺少设备编号")?;

            let mut input = QuoteInput::new(equipment_id.as_str());
            input.uses_per_day = parse_opt::<f64>(args.get(2), "uses_per_day")?.unwrap_or(0.0);
            input.price_per_use = parse_opt::<f64>(args.get(3), "price_per_use")?;
            if let Some(mode) = args.get(4) {
                input.payment_mode = mode.parse::<PaymentMode>().map_err(|e| anyhow!(e))?;
            }
            input.contract_months = parse_opt::<u32>(args.get(5), "months")?;

            let outcome = api.quote(&input, None).await?;
            println!("{}", serde_json::to_string_pretty(&outcome.snapshot)?);
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}

fn parse_opt<T>(raw: Option<&String>, name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("参数 {} 无效 ({}): {}", name, s, e)),
        None => Ok(None),
    }
}
