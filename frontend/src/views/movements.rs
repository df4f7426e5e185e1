use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, bind_select, form_message, icon_plus, icon_trash, page_shell, PageProps};
use crate::format::{format_currency, CURRENCY_SYMBOL};
use crate::models::{Category, Movement, MovementKind, NewMovement, RecordId};

fn parse_kind(value: &str) -> MovementKind {
    if value == "income" {
        MovementKind::Income
    } else {
        MovementKind::Expense
    }
}

/// Validates the add form; amounts must be positive, the kind carries the sign.
fn build_movement(
    date: &str,
    description: &str,
    amount: &str,
    kind: &str,
    category: &str,
) -> Result<NewMovement, &'static str> {
    let date = date.trim();
    let description = description.trim();
    if date.is_empty() || description.is_empty() || amount.trim().is_empty() {
        return Err("Please complete all fields.");
    }
    let amount = amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or("Amount must be a positive number.")?;

    Ok(NewMovement {
        description: description.to_string(),
        amount,
        kind: parse_kind(kind),
        date: date.to_string(),
        category_id: category.parse::<RecordId>().ok(),
    })
}

#[function_component(MovementsPage)]
pub fn movements_page(props: &PageProps) -> Html {
    let movements = use_state(|| props.ctx.movements.list().items());
    let categories = use_state(|| props.ctx.categories.items());
    let show_add = use_state(|| false);
    let form_date = use_state(String::new);
    let form_description = use_state(String::new);
    let form_amount = use_state(String::new);
    let form_kind = use_state(|| "expense".to_string());
    let form_category = use_state(String::new);
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    {
        let movements = movements.clone();
        let categories = categories.clone();
        let ctx = props.ctx.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    ctx.movements.list().fetch_list().await;
                    movements.set(ctx.movements.list().items());
                    ctx.categories.fetch_list().await;
                    categories.set(ctx.categories.items());
                });
                || ()
            },
            (),
        );
    }

    let on_toggle_add = {
        let show_add = show_add.clone();
        let form_error = form_error.clone();
        Callback::from(move |_| {
            show_add.set(!*show_add);
            form_error.set(None);
        })
    };

    let on_submit = {
        let form_date = form_date.clone();
        let form_description = form_description.clone();
        let form_amount = form_amount.clone();
        let form_kind = form_kind.clone();
        let form_category = form_category.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let show_add = show_add.clone();
        let movements = movements.clone();
        let ctx = props.ctx.clone();
        Callback::from(move |_| {
            let draft = match build_movement(
                &form_date,
                &form_description,
                &form_amount,
                &form_kind,
                &form_category,
            ) {
                Ok(draft) => draft,
                Err(msg) => {
                    form_error.set(Some(msg.to_string()));
                    return;
                }
            };

            form_error.set(None);
            saving.set(true);
            let form_date = form_date.clone();
            let form_description = form_description.clone();
            let form_amount = form_amount.clone();
            let form_error = form_error.clone();
            let saving = saving.clone();
            let show_add = show_add.clone();
            let movements = movements.clone();
            let ctx = ctx.clone();
            spawn_local(async move {
                if ctx.movements.list().create(&draft).await {
                    form_date.set(String::new());
                    form_description.set(String::new());
                    form_amount.set(String::new());
                    show_add.set(false);
                } else {
                    form_error.set(Some("Could not save the movement.".to_string()));
                }
                movements.set(ctx.movements.list().items());
                saving.set(false);
            });
        })
    };

    let on_delete = {
        let movements = movements.clone();
        let ctx = props.ctx.clone();
        Callback::from(move |id: RecordId| {
            let movements = movements.clone();
            let ctx = ctx.clone();
            spawn_local(async move {
                ctx.movements.list().delete(id).await;
                movements.set(ctx.movements.list().items());
            });
        })
    };

    page_shell(
        "Movements",
        html! {
            <button onclick={on_toggle_add} class="flex items-center gap-2 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all">
                { icon_plus() }
                { if *show_add { "Close" } else { "Add Movement" } }
            </button>
        },
        html! {
            <>
                if *show_add {
                    <div class="bg-card rounded-[10px] p-6 border border-border">
                        <div class="grid grid-cols-1 md:grid-cols-6 gap-3">
                            <input type="date" value={(*form_date).clone()} oninput={bind_input(&form_date)} class="p-2 border rounded" />
                            <input placeholder="Description" value={(*form_description).clone()} oninput={bind_input(&form_description)} class="p-2 border rounded" />
                            <input placeholder={format!("Amount ({})", CURRENCY_SYMBOL)} value={(*form_amount).clone()} oninput={bind_input(&form_amount)} class="p-2 border rounded" />
                            <select class="p-2 border rounded" onchange={bind_select(&form_kind)}>
                                <option value="expense" selected={*form_kind == "expense"}>{ MovementKind::Expense.label() }</option>
                                <option value="income" selected={*form_kind == "income"}>{ MovementKind::Income.label() }</option>
                            </select>
                            <select class="p-2 border rounded" onchange={bind_select(&form_category)}>
                                <option value="" selected={form_category.is_empty()}>{"No category"}</option>
                                { for categories.iter().map(|category: &Category| html! {
                                    <option value={category.id.to_string()} selected={*form_category == category.id.to_string()}>{ &category.name }</option>
                                }) }
                            </select>
                            <button onclick={on_submit} class="bg-accent text-white px-4 rounded" disabled={*saving}>{ if *saving { "Saving..." } else { "Save" } }</button>
                        </div>
                        { form_message(&form_error) }
                    </div>
                }

                <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
                    <table class="w-full text-left border-collapse">
                        <thead>
                            <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                                <th class="px-8 py-4 font-bold">{"Date"}</th>
                                <th class="px-8 py-4 font-bold">{"Description"}</th>
                                <th class="px-8 py-4 font-bold">{"Category"}</th>
                                <th class="px-8 py-4 font-bold text-right">{"Amount"}</th>
                                <th class="px-8 py-4"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { for movements.iter().map(|movement: &Movement| {
                                let id = movement.id;
                                let on_delete = on_delete.clone();
                                let amount_class = match movement.kind {
                                    MovementKind::Income => "px-8 py-4 text-right font-semibold text-green-600",
                                    MovementKind::Expense => "px-8 py-4 text-right font-semibold text-foreground",
                                };
                                html! {
                                    <tr key={id} class="text-sm hover:bg-muted/30 transition-colors">
                                        <td class="px-8 py-4 text-muted-foreground">{ &movement.date }</td>
                                        <td class="px-8 py-4 text-foreground">{ &movement.description }</td>
                                        <td class="px-8 py-4">{ movement.category_name().unwrap_or("-") }</td>
                                        <td class={amount_class}>{ format_currency(movement.signed_amount(), CURRENCY_SYMBOL) }</td>
                                        <td class="px-8 py-4 text-right">
                                            <button aria-label="Delete" onclick={Callback::from(move |_| on_delete.emit(id))}>{ icon_trash() }</button>
                                        </td>
                                    </tr>
                                }
                            }) }
                        </tbody>
                    </table>
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_builds_a_draft_with_optional_category() {
        let draft = build_movement("2026-10-03", " Coffee ", "3.5", "expense", "").unwrap();
        assert_eq!(draft.description, "Coffee");
        assert_eq!(draft.amount, 3.5);
        assert_eq!(draft.kind, MovementKind::Expense);
        assert_eq!(draft.category_id, None);

        let draft = build_movement("2026-10-03", "Pay", "1000", "income", "4").unwrap();
        assert_eq!(draft.kind, MovementKind::Income);
        assert_eq!(draft.category_id, Some(4));
    }

    #[test]
    fn form_rejects_missing_fields_and_bad_amounts() {
        assert!(build_movement("", "x", "1", "expense", "").is_err());
        assert_eq!(
            build_movement("2026-10-03", "x", "-4", "expense", ""),
            Err("Amount must be a positive number.")
        );
        assert!(build_movement("2026-10-03", "x", "abc", "expense", "").is_err());
    }
}
