// UI layer: an interactive menu built with `dialoguer` that drives the
// list and form view models. Rendering and navigation live here; the view
// models stay free of terminal code.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::CatalogClient;
use crate::error::ViewError;
use crate::form::{FormMode, ImagePreview, ProductForm};
use crate::list::{DeleteOutcome, ProductList, ProductRow};
use crate::route::FormRoute;
use crate::session::AdminSession;

/// Main interactive loop. Shows the product list and dispatches the
/// actions picked by the user until "Exit" is chosen.
pub async fn main_menu(api: CatalogClient, session: AdminSession) -> Result<()> {
    let mut list = ProductList::new(api.clone());
    report(with_spinner("Loading products...", list.activate()).await?);

    loop {
        render_table(&list.rows());

        let items = vec!["Add product", "Edit product", "Delete product", "Show details", "Refresh", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                let route = list.request_add();
                if run_form(&api, session, route).await? {
                    report(with_spinner("Refreshing...", list.activate()).await?);
                }
            }
            1 => {
                let Some(index) = pick_product(&list)? else { continue };
                let route = list.request_edit(&list.products()[index]);
                if run_form(&api, session, route).await? {
                    report(with_spinner("Refreshing...", list.activate()).await?);
                }
            }
            2 => {
                let Some(index) = pick_product(&list)? else { continue };
                let id = list.products()[index].id;
                let mut prompt_error = None;
                let outcome = list
                    .request_delete(id, |prompt| {
                        Confirm::new()
                            .with_prompt(prompt)
                            .default(false)
                            .interact()
                            .unwrap_or_else(|e| {
                                prompt_error = Some(e);
                                false
                            })
                    })
                    .await;
                if let Some(e) = prompt_error {
                    return Err(e.into());
                }
                match outcome {
                    Ok(DeleteOutcome::Deleted) => println!("{}", "Product deleted".green()),
                    Ok(DeleteOutcome::Cancelled) => {}
                    Err(e) => println!("{} {}", "Delete failed:".red(), e),
                }
            }
            3 => {
                let Some(index) = pick_product(&list)? else { continue };
                let product = &list.products()[index];
                println!("{}", serde_json::to_string_pretty(product)?);
                println!("Image: {}", list.resolve_image(product));
            }
            4 => report(with_spinner("Refreshing...", list.activate()).await?),
            5 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Ask the admin for their id when no session exists yet and persist it.
pub fn identify() -> Result<AdminSession> {
    let admin_id: u32 = Input::new().with_prompt("Admin id").interact_text()?;
    let session = AdminSession::new(admin_id);
    session.persist()?;
    Ok(session)
}

/// Fill in and submit the product form. Returns whether something was saved.
async fn run_form(api: &CatalogClient, session: AdminSession, route: FormRoute) -> Result<bool> {
    let mut form = ProductForm::new(api.clone(), session, route);
    if let Err(e) = with_spinner("Loading product...", form.activate()).await? {
        println!("{} {}", "Could not load product:".red(), e);
        if !Confirm::new().with_prompt("Continue with an empty form?").default(false).interact()? {
            return Ok(false);
        }
    }

    let title = match form.mode() {
        FormMode::Add => "Add product".to_string(),
        FormMode::Edit(id) => format!("Edit product #{}", id),
    };
    println!("{}", title.bold());

    loop {
        form.fields.name = prompt_text("Name", &form.fields.name)?;
        form.fields.description = prompt_text("Description", &form.fields.description)?;
        form.fields.price = prompt_text("Price", &form.fields.price)?;
        form.fields.stock_quantity = prompt_text("Stock quantity", &form.fields.stock_quantity)?;
        form.fields.category_id = prompt_text("Category id", &form.fields.category_id)?;
        choose_image(&mut form).await?;

        match with_spinner("Saving...", form.submit()).await? {
            Ok(product) => {
                println!("{} #{} {}", "Saved".green(), product.id, product.name);
                return Ok(true);
            }
            Err(ViewError::Invalid(errors)) => {
                for error in errors.errors() {
                    println!("  {}", error.to_string().yellow());
                }
            }
            Err(e) => println!("{} {}", "Save failed:".red(), e),
        }

        if !Confirm::new().with_prompt("Try again?").default(true).interact()? {
            return Ok(false);
        }
    }
}

async fn choose_image(form: &mut ProductForm<CatalogClient>) -> Result<()> {
    if let Some(src) = form.preview_src() {
        println!("Current image: {}", preview_label(form.preview(), &src));
    }
    let items = vec!["Keep current image", "Type image path", "Browse..."];
    let path = match Select::new().with_prompt("Image").items(&items).default(0).interact()? {
        1 => {
            let path: String = Input::new().with_prompt("Image file path").interact_text()?;
            Some(PathBuf::from(path))
        }
        2 => rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
            .pick_file(),
        _ => None,
    };

    if let Some(path) = path {
        match form.select_image(&path).await {
            Ok(()) => println!("{}", "Image selected".green()),
            Err(e) => println!("{} {}", "Image rejected:".red(), e),
        }
    }
    Ok(())
}

fn preview_label(preview: &ImagePreview, src: &str) -> String {
    match preview {
        ImagePreview::Data(_) => format!("local file ({} bytes encoded)", src.len()),
        _ => src.to_string(),
    }
}

fn prompt_text(label: &str, current: &str) -> Result<String> {
    let mut input = Input::<String>::new();
    input.with_prompt(label).allow_empty(true);
    if !current.is_empty() {
        input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}

fn pick_product<C: crate::api::CatalogApi>(list: &ProductList<C>) -> Result<Option<usize>> {
    if list.products().is_empty() {
        println!("No products.");
        return Ok(None);
    }
    let items: Vec<String> = list
        .products()
        .iter()
        .map(|p| format!("#{} {}", p.id, p.name))
        .collect();
    Ok(Select::new().items(&items).default(0).interact_opt()?)
}

fn render_table(rows: &[ProductRow]) {
    println!(
        "{}",
        format!("{:>5}  {:<28} {:>10} {:>7} {:>8}  {}", "ID", "Name", "Price", "Stock", "Category", "Image").bold()
    );
    for row in rows {
        println!(
            "{:>5}  {:<28} {:>10.2} {:>7} {:>8}  {}",
            row.id, row.name, row.price, row.stock_quantity, row.category_id, row.image_url
        );
    }
}

fn report(result: std::result::Result<(), ViewError>) {
    if let Err(e) = result {
        println!("{} {}", "Error fetching products:".red(), e);
    }
}

/// Run `task` while an `indicatif` spinner shows `message`.
async fn with_spinner<T>(message: &'static str, task: impl Future<Output = T>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = task.await;
    spinner.finish_and_clear();
    Ok(out)
}
