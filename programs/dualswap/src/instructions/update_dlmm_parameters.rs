use crate::constants::{seeds, MAX_WHITELIST_ENTRIES};
use crate::errors::DualswapError;
use crate::events::DlmmParametersUpdated;
use crate::state::{ParameterAction, ParameterList, ParameterWhitelist, PoolParameter};
use anchor_lang::prelude::*;

/// Add or remove one (bin_step, fee_rate) pair on a whitelist
#[derive(Accounts)]
pub struct UpdateDlmmParameters<'info> {
    #[account(
        mut,
        seeds = [seeds::WHITELIST_SEED],
        bump = whitelist.bump,
        has_one = authority @ DualswapError::Unauthorized,
    )]
    pub whitelist: Account<'info, ParameterWhitelist>,

    pub authority: Signer<'info>,
}

/// Update whitelist handler
pub fn handler(
    ctx: Context<UpdateDlmmParameters>,
    list: ParameterList,
    action: ParameterAction,
    parameter: PoolParameter,
) -> Result<()> {
    require!(parameter.bin_step > 0, DualswapError::InvalidBinStep);
    require!(parameter.fee_rate < 10_000, DualswapError::InvalidFeeRates);

    let whitelist = &mut ctx.accounts.whitelist;
    let entries = match list {
        ParameterList::Official => &mut whitelist.official,
        ParameterList::Community => &mut whitelist.community,
    };

    match action {
        ParameterAction::Add => {
            // Adding an existing pair is a no-op rather than an error.
            if !entries.contains(&parameter) {
                require!(
                    entries.len() < MAX_WHITELIST_ENTRIES,
                    DualswapError::InvalidParameters
                );
                entries.push(parameter);
            }
        }
        ParameterAction::Remove => {
            entries.retain(|p| *p != parameter);
        }
    }

    emit!(DlmmParametersUpdated {
        list,
        action,
        bin_step: parameter.bin_step,
        fee_rate: parameter.fee_rate,
    });

    Ok(())
}
