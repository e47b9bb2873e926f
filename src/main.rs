//! Main module for the CAET portal front end using Yew.
//! Picks the home or dashboard view and wires the navigation around it.

use caet_portal::api::FetchTransport;
use caet_portal::components::{
    FileList, ForgotPasswordForm, LoginForm, ProfileForm, RegisterForm, UploadForm,
};
use caet_portal::config::{HOME_PATH, MSG_FILES_LOAD_FAILED};
use caet_portal::loaders::{load_user_files, load_user_profile, profile_load_message, FileListing};
use caet_portal::view::{Section, Tab, ViewAction, ViewState};
use caet_portal::{dom, identity, FormKind, UserProfile};
use log::{info, warn};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
struct NavBarProps {
    view: ViewState,
    on_action: Callback<ViewAction>,
}

#[function_component(NavBar)]
fn nav_bar(props: &NavBarProps) -> Html {
    let toggle = props.on_action.reform(|_: MouseEvent| ViewAction::ToggleMenu);
    let on_logout = Callback::from(|_: MouseEvent| {
        let csrf_token = dom::csrf_token(FormKind::Logout);
        wasm_bindgen_futures::spawn_local(async move {
            match identity::logout(&FetchTransport, &csrf_token).await {
                Ok(()) => {
                    dom::alert("Logged out successfully!");
                    dom::redirect(HOME_PATH);
                }
                Err(e) => dom::alert(&identity::failure_message("Logout failed", &e)),
            }
        });
    });

    html! {
        <nav class="navbar">
            <span class="brand">{ "CAET" }</span>
            <button class="menu-toggle" aria-label="Menu" onclick={toggle}>{ "☰" }</button>
            <ul class={props.view.nav_list_class()}>
                <li><a href={HOME_PATH}>{ "Home" }</a></li>
                if props.view.section == Section::Dashboard {
                    <li><button class="btn-secondary" onclick={on_logout}>{ "Log out" }</button></li>
                }
            </ul>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct HomeViewProps {
    view: ViewState,
    on_action: Callback<ViewAction>,
}

#[function_component(HomeView)]
fn home_view(props: &HomeViewProps) -> Html {
    let on_show_tab = props.on_action.reform(ViewAction::ShowTab);
    let view = props.view;

    html! {
        <>
            <ul class="tabs">
                { Tab::ALL.iter().map(|&tab| {
                    let onclick = props.on_action.reform(move |e: MouseEvent| {
                        e.prevent_default();
                        ViewAction::ShowTab(tab)
                    });
                    html! {
                        <li class={view.tab_link_item_class(tab)}>
                            <a class="tab-link" href={format!("#{}", tab.id())} {onclick}>{ tab.label() }</a>
                        </li>
                    }
                }).collect::<Html>() }
            </ul>
            <div id={Tab::Login.id()} class={view.tab_panel_class(Tab::Login)}>
                <LoginForm />
            </div>
            <div id={Tab::Register.id()} class={view.tab_panel_class(Tab::Register)}>
                <RegisterForm on_show_tab={on_show_tab} />
            </div>
            <div id={Tab::ForgotPassword.id()} class={view.tab_panel_class(Tab::ForgotPassword)}>
                <ForgotPasswordForm />
            </div>
            <div id={Tab::Upload.id()} class={view.tab_panel_class(Tab::Upload)}>
                <UploadForm />
            </div>
        </>
    }
}

#[function_component(DashboardView)]
fn dashboard_view() -> Html {
    let profile = use_state(|| None::<UserProfile>);
    let listing = use_state(FileListing::default);
    // Incremented to trigger a file list reload
    let files_version = use_state(|| 0u32);

    {
        let profile = profile.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match load_user_profile(&FetchTransport).await {
                    Ok(loaded) => profile.set(Some(loaded)),
                    Err(e) => {
                        warn!("Profile load failed: {}", e);
                        dom::alert(&profile_load_message(&e));
                    }
                }
            });
            || ()
        });
    }

    {
        let listing = listing.clone();
        use_effect_with(*files_version, move |version| {
            info!("Loading file list (version {})", version);
            wasm_bindgen_futures::spawn_local(async move {
                match load_user_files(&FetchTransport).await {
                    Ok(loaded) => listing.set(loaded),
                    Err(e) => {
                        warn!("File list load failed: {}", e);
                        dom::alert(MSG_FILES_LOAD_FAILED);
                    }
                }
            });
            || ()
        });
    }

    let on_uploaded = {
        let files_version = files_version.clone();
        Callback::from(move |_: ()| files_version.set(files_version.wrapping_add(1)))
    };

    html! {
        <>
            <div class="card">
                <h2>{ "Profile" }</h2>
                <ProfileForm profile={(*profile).clone()} />
            </div>
            <div class="card">
                <h2>{ "Upload files" }</h2>
                <UploadForm {on_uploaded} />
            </div>
            <div class="card">
                <h2>{ "Your files" }</h2>
                <FileList listing={(*listing).clone()} />
            </div>
        </>
    }
}

/// Primary application component holding the view state.
#[function_component]
pub fn App() -> Html {
    let view = use_reducer(|| ViewState::new(Section::from_path(&dom::current_path())));
    let on_action = {
        let dispatcher = view.dispatcher();
        Callback::from(move |action: ViewAction| dispatcher.dispatch(action))
    };

    // Sign-in buttons render into slots inside the login/register forms.
    use_effect_with((), |_| {
        identity::init_google_sign_in();
        || ()
    });

    html! {
        <>
            <NavBar view={*view} on_action={on_action.clone()} />
            <main>
                <section id={Section::Home.id()} class={view.section_class(Section::Home)}>
                    if view.section == Section::Home {
                        <HomeView view={*view} on_action={on_action.clone()} />
                    }
                </section>
                <section id={Section::Dashboard.id()} class={view.section_class(Section::Dashboard)}>
                    if view.section == Section::Dashboard {
                        <DashboardView />
                    }
                </section>
            </main>
        </>
    }
}

/// Entry point: installs logging and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
