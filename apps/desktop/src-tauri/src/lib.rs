mod view;

use std::collections::HashMap;

use log::{info, warn, LevelFilter};
use tauri::async_runtime::Mutex;
use tauri::{Manager, State};
use tauri_plugin_opener::OpenerExt;
use viral_studio_core::{
    schedule_dismissal, LocaleLoadOutcome, SelectedFile, SelectionEntry, StudioClient,
    StudioConfig, SubmissionController, SubmissionOutcome, TaggedElement, TranslationLoader,
};

use crate::view::TauriView;

struct Studio {
    controller: Mutex<SubmissionController<TauriView>>,
    translations: Mutex<TranslationLoader>,
    selection: Mutex<Vec<SelectedFile>>,
    client: StudioClient,
    view: TauriView,
}

#[tauri::command]
async fn select_files(
    state: State<'_, Studio>,
    paths: Vec<String>,
) -> Result<Vec<SelectionEntry>, String> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        match SelectedFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => warn!("skipping unreadable selection {}: {}", path, e),
        }
    }

    let report = state.controller.lock().await.on_selection_changed(&files);
    *state.selection.lock().await = files;
    Ok(report.entries)
}

#[tauri::command]
async fn submit_upload(
    state: State<'_, Studio>,
    form: HashMap<String, String>,
) -> Result<SubmissionOutcome, String> {
    let Ok(mut controller) = state.controller.try_lock() else {
        return Err("a submission is already in progress".into());
    };
    let files = state.selection.lock().await.clone();
    controller
        .submit(&files, &form)
        .await
        .map_err(|e| e.to_string())
}

/// The page reports its translatable elements once loaded, then picks a locale.
#[tauri::command]
fn register_tagged_elements(state: State<'_, Studio>, elements: Vec<TaggedElement>) {
    state.view.register_tagged_elements(elements);
}

#[tauri::command]
async fn change_locale(
    state: State<'_, Studio>,
    locale: String,
) -> Result<LocaleLoadOutcome, String> {
    let mut view = state.view.clone();
    let outcome = state.translations.lock().await.load(&mut view, &locale).await;
    if let LocaleLoadOutcome::Unavailable { warning } = &outcome {
        schedule_dismissal(view, warning);
    }
    Ok(outcome)
}

#[tauri::command]
fn open_result_link(
    app: tauri::AppHandle,
    state: State<'_, Studio>,
    path: String,
) -> Result<(), String> {
    let url = state
        .client
        .base_url()
        .join(path.trim_start_matches('/'))
        .map_err(|e| e.to_string())?;
    info!("opening {}", url);
    app.opener()
        .open_url(url.as_str(), None::<&str>)
        .map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::<tauri::Wry>::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(LevelFilter::Info)
                        .build(),
                )?;
            }

            let config = StudioConfig::load_or_default();
            let client = StudioClient::new(&config)?;
            let view = TauriView::new(app.handle().clone(), config.ui.clone());
            let controller = SubmissionController::new(client.clone(), view.clone(), &config);
            let translations = TranslationLoader::new(client.clone(), &config.locale);
            info!("generation service at {}", config.server.base_url);

            app.manage(Studio {
                controller: Mutex::new(controller),
                translations: Mutex::new(translations),
                selection: Mutex::new(Vec::new()),
                client,
                view,
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            select_files,
            submit_upload,
            register_tagged_elements,
            change_locale,
            open_result_link
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
