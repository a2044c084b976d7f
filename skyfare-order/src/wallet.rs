use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use skyfare_core::models::{Wallet, WalletTransaction};
use skyfare_core::{CoreError, CoreResult};
use skyfare_store::{MemStore, Mutation};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<WalletTransaction>,
    pub total: usize,
    pub page: u32,
    pub pages: u32,
}

/// Closed-loop wallet ledger. Debits enforce non-negativity inside the
/// store's locked apply, so concurrent debits against one wallet cannot both
/// pass the sufficient-funds check on a stale balance.
pub struct WalletLedger {
    store: Arc<MemStore>,
}

impl WalletLedger {
    pub fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    pub async fn wallet(&self, user_id: Uuid) -> CoreResult<Wallet> {
        self.store
            .wallet(user_id)
            .await
            .ok_or_else(|| CoreError::NotFound(format!("wallet for user {user_id}")))
    }

    /// Debit the wallet; fails with `InsufficientWalletBalance` and no side
    /// effect when the balance cannot cover the amount. Returns the balance
    /// after the debit.
    pub async fn debit(
        &self,
        user_id: Uuid,
        amount: i64,
        description: impl Into<String>,
    ) -> CoreResult<i64> {
        let description = description.into();
        self.store
            .apply(vec![Mutation::DebitWallet {
                user_id,
                amount,
                description,
            }])
            .await?;
        debug!(%user_id, amount, "wallet debited");
        Ok(self.wallet(user_id).await?.balance)
    }

    /// Credit the wallet; no upper bound. Returns the balance after the
    /// credit.
    pub async fn credit(
        &self,
        user_id: Uuid,
        amount: i64,
        description: impl Into<String>,
    ) -> CoreResult<i64> {
        let description = description.into();
        self.store
            .apply(vec![Mutation::CreditWallet {
                user_id,
                amount,
                description,
            }])
            .await?;
        debug!(%user_id, amount, "wallet credited");
        Ok(self.wallet(user_id).await?.balance)
    }

    /// Transactions newest-first, paginated. Page numbering starts at 1.
    pub async fn transactions(
        &self,
        user_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> CoreResult<TransactionPage> {
        let wallet = self.wallet(user_id).await?;
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let total = wallet.transactions.len();
        let pages = (total as u32).div_ceil(page_size).max(1);
        // Widen before multiplying: page and page_size are caller-controlled.
        // Any skip past the end yields an empty page, so clamp to total.
        let skip = ((page as u64 - 1) * page_size as u64).min(total as u64) as usize;

        // Insertion order is chronological; newest-first is the reverse.
        let transactions = wallet
            .transactions
            .into_iter()
            .rev()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        Ok(TransactionPage {
            transactions,
            total,
            page,
            pages,
        })
    }
}
