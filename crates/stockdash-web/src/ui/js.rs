//! Client-side logic: loads the menu, submits view arguments to the JSON API
//! and renders the returned page widgets. Charts are drawn as inline SVG.

pub const SCRIPT: &str = r##"
// ============================================================================
// Configuration
// ============================================================================
const CONFIG = {
    apiBase: '',
    width: 960,
    paneHeight: { price: 260, volume: 80, oscillator: 140 },
    palette: ['#58a6ff', '#d29922', '#a371f7', '#3fb950', '#f85149', '#79c0ff', '#ff7b72', '#e3b341']
};

let menu = [];

// ============================================================================
// API
// ============================================================================
async function fetchJSON(endpoint) {
    const res = await fetch(CONFIG.apiBase + endpoint);
    const body = await res.json();
    if (!res.ok) {
        throw new Error(body.message || ('HTTP ' + res.status));
    }
    return body;
}

async function loadMenu() {
    const envelope = await fetchJSON('/api/menu');
    menu = envelope.data;
    const select = document.getElementById('menu');
    select.innerHTML = menu
        .map(entry => `<option value='${entry.slug}'>${escapeHtml(entry.label)}</option>`)
        .join('');
    onMenuChange();
}

function currentSlug() {
    return document.getElementById('menu').value;
}

function onMenuChange() {
    const slug = currentSlug();
    const entry = menu.find(item => item.slug === slug);
    document.getElementById('menuDescription').textContent = entry ? entry.description : '';
    document.querySelectorAll('#args label').forEach(label => {
        const views = (label.dataset.views || '').split(' ');
        label.classList.toggle('hidden', !views.includes(slug));
    });
}

function queryString() {
    const slug = currentSlug();
    const params = new URLSearchParams();
    document.querySelectorAll('#args label').forEach(label => {
        if (!(label.dataset.views || '').split(' ').includes(slug)) return;
        const input = label.querySelector('input, select');
        if (input.type === 'checkbox') {
            if (input.checked) params.set(input.name, 'true');
        } else if (input.value !== '') {
            params.set(input.name, input.value);
        }
    });
    return params.toString();
}

async function renderView() {
    const slug = currentSlug();
    const button = document.getElementById('renderBtn');
    const error = document.getElementById('error');
    button.disabled = true;
    error.classList.add('hidden');
    try {
        const query = queryString();
        const envelope = await fetchJSON(`/api/views/${slug}` + (query ? '?' + query : ''));
        renderPage(envelope.data);
        document.getElementById('refreshTime').textContent =
            `Rendered in ${envelope.meta.latency_ms} ms from ${envelope.meta.source_chain.join(', ')}`;
    } catch (e) {
        error.textContent = e.message;
        error.classList.remove('hidden');
    } finally {
        button.disabled = false;
    }
}

// ============================================================================
// Widgets
// ============================================================================
function escapeHtml(value) {
    return String(value)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/'/g, '&#39;');
}

function renderPage(page) {
    const root = document.getElementById('page');
    root.innerHTML = '';
    let metrics = null;
    for (const widget of page.widgets) {
        if (widget.type === 'metric') {
            if (!metrics) {
                metrics = document.createElement('div');
                metrics.className = 'metrics-row';
                root.appendChild(metrics);
            }
            metrics.insertAdjacentHTML('beforeend', renderMetric(widget));
            continue;
        }
        metrics = null;
        root.insertAdjacentHTML('beforeend', renderWidget(widget));
    }
}

function renderWidget(widget) {
    switch (widget.type) {
        case 'heading': return `<h2>${escapeHtml(widget.text)}</h2>`;
        case 'text': return `<p class='description'>${escapeHtml(widget.text)}</p>`;
        case 'table': return renderTable(widget);
        case 'chart': return renderChart(widget);
        case 'alert':
            return `<div class='alert alert-${widget.level}'>
                <div class='alert-title'>${escapeHtml(widget.title)}</div>
                <div>${escapeHtml(widget.message)}</div>
            </div>`;
        case 'commentary':
            return `<div class='card commentary'>
                <div class='card-title'>Commentary</div>
                <div>${escapeHtml(widget.text)}</div>
                <div class='model'>${escapeHtml(widget.model)}</div>
            </div>`;
        default: return '';
    }
}

function renderMetric(metric) {
    const delta = metric.delta
        ? `<div class='metric-delta ${metric.tone}'>${escapeHtml(metric.delta)}</div>`
        : '';
    return `<div class='card'>
        <div class='card-title'>${escapeHtml(metric.label)}</div>
        <div class='metric-value ${metric.delta ? '' : metric.tone}'>${escapeHtml(metric.value)}</div>
        ${delta}
    </div>`;
}

function renderTable(table) {
    const head = table.columns.map(col => `<th>${escapeHtml(col)}</th>`).join('');
    const body = table.rows.length
        ? table.rows.map(row => '<tr>' + row.map(cell => `<td>${escapeHtml(cell)}</td>`).join('') + '</tr>').join('')
        : `<tr><td colspan='${table.columns.length}' class='neutral'>No rows</td></tr>`;
    return `<div class='card'>
        <div class='card-title'>${escapeHtml(table.title)}</div>
        <table><thead><tr>${head}</tr></thead><tbody>${body}</tbody></table>
    </div>`;
}

// ============================================================================
// Charts
// ============================================================================
function extent(values) {
    const finite = values.filter(v => v != null && isFinite(v));
    if (!finite.length) return [0, 1];
    let lo = Math.min(...finite);
    let hi = Math.max(...finite);
    if (lo === hi) { lo -= 1; hi += 1; }
    return [lo, hi];
}

function renderChart(chart) {
    const panes = ['price', 'volume', 'oscillator'].filter(pane =>
        (pane === 'price' && chart.candles && chart.candles.length) ||
        chart.series.some(series => series.pane === pane));
    const margin = { left: 56, right: 12, top: 8, bottom: 24 };
    const plotWidth = CONFIG.width - margin.left - margin.right;
    const n = Math.max(chart.x.length, 1);
    const step = plotWidth / n;
    const xAt = i => margin.left + step * (i + 0.5);

    let top = margin.top;
    let svg = '';
    const legend = [];
    let colorIndex = 0;

    for (const pane of panes) {
        const height = CONFIG.paneHeight[pane];
        const series = chart.series.filter(s => s.pane === pane);
        const candles = pane === 'price' ? (chart.candles || []) : [];
        let values = series.flatMap(s => s.values);
        if (candles.length) values = values.concat(candles.flatMap(c => [c.high, c.low]));
        if (chart.kind === 'bar') values.push(0);
        const [lo, hi] = extent(values);
        const yAt = v => top + height - ((v - lo) / (hi - lo)) * height;

        svg += `<line class='axis' x1='${margin.left}' y1='${top + height}' x2='${CONFIG.width - margin.right}' y2='${top + height}'/>`;
        svg += `<text x='4' y='${top + 10}'>${hi.toFixed(2)}</text>`;
        svg += `<text x='4' y='${top + height}'>${lo.toFixed(2)}</text>`;

        candles.forEach((c, i) => {
            const color = c.close >= c.open ? 'var(--green)' : 'var(--red)';
            const bodyTop = yAt(Math.max(c.open, c.close));
            const bodyHeight = Math.max(Math.abs(yAt(c.open) - yAt(c.close)), 1);
            svg += `<line x1='${xAt(i)}' x2='${xAt(i)}' y1='${yAt(c.high)}' y2='${yAt(c.low)}' stroke='${color}'/>`;
            svg += `<rect x='${xAt(i) - step * 0.35}' y='${bodyTop}' width='${step * 0.7}' height='${bodyHeight}' fill='${color}'/>`;
        });

        const barSeries = series.filter(s => s.style === 'bar');
        series.forEach(s => {
            const color = CONFIG.palette[colorIndex++ % CONFIG.palette.length];
            legend.push(`<span style='--swatch:${color}'>${escapeHtml(s.name)}</span>`);
            if (s.style === 'bar') {
                const slot = barSeries.indexOf(s);
                const width = (step * 0.8) / barSeries.length;
                const zero = yAt(Math.max(lo, Math.min(0, hi)));
                s.values.forEach((v, i) => {
                    if (v == null) return;
                    const x = xAt(i) - step * 0.4 + slot * width;
                    const y = Math.min(yAt(v), zero);
                    svg += `<rect x='${x}' y='${y}' width='${width}' height='${Math.max(Math.abs(zero - yAt(v)), 1)}' fill='${color}' opacity='0.8'/>`;
                });
            } else {
                let path = '';
                let pen = 'M';
                s.values.forEach((v, i) => {
                    if (v == null) { pen = 'M'; return; }
                    path += `${pen}${xAt(i).toFixed(1)},${yAt(v).toFixed(1)} `;
                    pen = 'L';
                });
                svg += `<path d='${path}' fill='none' stroke='${color}' stroke-width='1.5'/>`;
            }
        });
        top += height + margin.bottom;
    }

    const labelEvery = Math.max(1, Math.ceil(n / 8));
    chart.x.forEach((label, i) => {
        if (i % labelEvery !== 0) return;
        svg += `<text x='${xAt(i)}' y='${top - 8}' text-anchor='middle'>${escapeHtml(label)}</text>`;
    });

    return `<div class='card'>
        <div class='card-title'>${escapeHtml(chart.title)}</div>
        <svg class='chart' viewBox='0 0 ${CONFIG.width} ${top}'>${svg}</svg>
        <div class='legend'>${legend.join('')}</div>
    </div>`;
}

// ============================================================================
// Init
// ============================================================================
loadMenu().catch(e => {
    const error = document.getElementById('error');
    error.textContent = 'Failed to load menu: ' + e.message;
    error.classList.remove('hidden');
});
"##;
